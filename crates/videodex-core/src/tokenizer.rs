use std::collections::HashSet;

use crate::models::VideoRecord;

/// Minimum prefix length emitted for Latin-script words.
pub const LATIN_MIN_PREFIX: usize = 3;
/// Minimum prefix length emitted for non-Latin-script words, where shorter
/// tokens are commonly meaningful.
pub const NON_LATIN_MIN_PREFIX: usize = 2;

const PUNCTUATION: &[char] = &[
    '.', ',', ';', '!', '?', '(', ')', '[', ']', '{', '}', '\'', '"', '`', '-', '\u{2013}',
    '\u{2014}',
];

/// Turns arbitrary text into the set of index terms: each case-folded word
/// plus every character prefix of it from the script-dependent minimum up to
/// its full length. Duplicates across words collapse.
#[must_use]
pub fn tokenize(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let mut terms = HashSet::new();

    for word in lowered
        .split(is_word_boundary)
        .filter(|word| !word.is_empty())
    {
        terms.insert(word.to_string());

        let chars: Vec<char> = word.chars().collect();
        let min_len = min_prefix_len(word);
        if chars.len() >= min_len {
            for end in min_len..=chars.len() {
                terms.insert(chars[..end].iter().collect());
            }
        }
    }

    terms
}

/// Concatenates a record's searchable fields in priority order: title, then
/// free-text tags, then flattened category names. Case folding happens in
/// [`tokenize`].
#[must_use]
pub fn searchable_text(video: &VideoRecord) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(
        1 + video.search_tags.len() + video.category_data.flat_categories.len(),
    );
    if !video.title.is_empty() {
        parts.push(&video.title);
    }
    parts.extend(video.search_tags.iter().map(String::as_str));
    parts.extend(video.category_data.flat_categories.iter().map(String::as_str));
    parts.join(" ")
}

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || PUNCTUATION.contains(&c)
}

fn min_prefix_len(word: &str) -> usize {
    if is_non_latin(word) {
        NON_LATIN_MIN_PREFIX
    } else {
        LATIN_MIN_PREFIX
    }
}

/// Range heuristic: a word is non-Latin if any character falls outside the
/// Latin blocks. Everything below U+0370 (where Greek starts) counts as
/// Latin, as do the Latin Extended blocks scattered higher in the plane, so
/// precomposed Latin such as Vietnamese keeps the Latin prefix minimum.
fn is_non_latin(word: &str) -> bool {
    word.chars().any(is_non_latin_char)
}

fn is_non_latin_char(c: char) -> bool {
    let cp = c as u32;
    if cp < 0x0370 {
        return false;
    }
    !matches!(
        cp,
        0x1E00..=0x1EFF // Latin Extended Additional
            | 0x2C60..=0x2C7F // Latin Extended-C
            | 0xA720..=0xA7FF // Latin Extended-D
            | 0xAB30..=0xAB6F // Latin Extended-E
    )
}
