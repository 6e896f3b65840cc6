//! Category-path matching.
//!
//! A path addresses a node in the ≤3-level taxonomy by joining ancestor keys
//! with `|`. Arity selects the rule: 1 and 2 segments match the node or any
//! descendant, 3 segments (a leaf) match exactly. Category-only filtering and
//! search-within-category both go through [`matches_category`]; the two must
//! never diverge.

pub const PATH_SEPARATOR: char = '|';

/// Does a video with the given exact paths belong under `category_path`?
#[must_use]
pub fn matches_category(exact_paths: &[String], category_path: &str) -> bool {
    let segments: Vec<&str> = category_path.split(PATH_SEPARATOR).collect();
    match segments.len() {
        1 => exact_paths
            .iter()
            .any(|path| node_or_descendant(path, segments[0])),
        2 => exact_paths
            .iter()
            .any(|path| node_or_descendant(path, category_path)),
        3 => exact_paths.iter().any(|path| path == category_path),
        _ => false,
    }
}

fn node_or_descendant(exact_path: &str, prefix: &str) -> bool {
    exact_path == prefix
        || exact_path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn main_category_matches_itself_and_descendants() {
        let video = paths(&["Music|Pop", "Travel"]);
        assert!(matches_category(&video, "Music"));
        assert!(matches_category(&video, "Travel"));
        assert!(!matches_category(&video, "Sports"));
    }

    #[test]
    fn main_category_does_not_match_by_raw_string_prefix() {
        // "Mus" is not the "Music" category even though it is a string prefix.
        let video = paths(&["Music|Pop"]);
        assert!(!matches_category(&video, "Mus"));
        // "Musical" must not match a video under "Music".
        assert!(!matches_category(&paths(&["Musical"]), "Music"));
    }

    #[test]
    fn sub_category_matches_itself_and_descendants() {
        let video = paths(&["Music|Pop|Synth"]);
        assert!(matches_category(&video, "Music|Pop"));
        assert!(!matches_category(&video, "Music|Rock"));
    }

    #[test]
    fn leaf_path_matches_exactly_only() {
        let video = paths(&["Music|Pop|Synth"]);
        assert!(matches_category(&video, "Music|Pop|Synth"));
        assert!(!matches_category(&paths(&["Music|Pop"]), "Music|Pop|Synth"));
    }

    #[test]
    fn deeper_than_three_segments_never_matches() {
        let video = paths(&["Music|Pop|Synth"]);
        assert!(!matches_category(&video, "Music|Pop|Synth|Retro"));
    }

    #[test]
    fn video_with_exact_main_path_matches_main_filter() {
        let video = paths(&["Music"]);
        assert!(matches_category(&video, "Music"));
        assert!(!matches_category(&video, "Music|Pop"));
    }
}
