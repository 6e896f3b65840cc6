use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::Catalog;
use crate::tokenizer::{searchable_text, tokenize};

/// The inverted search index: term → posting set of video ids, plus the
/// inverse id → term-set mapping kept for incremental-rebuild diagnostics.
///
/// Built exactly once per successful video stage and read-only afterwards.
#[derive(Debug, Default)]
pub struct SearchIndex {
    postings: HashMap<String, HashSet<Arc<str>>>,
    terms_by_video: HashMap<Arc<str>, HashSet<String>>,
}

impl SearchIndex {
    /// One synchronous pass over the whole catalog: tokenize each record's
    /// searchable text and record the terms in both directions.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = Self::default();
        for id in catalog.order() {
            let Some(video) = catalog.get(id.as_ref()) else {
                continue;
            };
            let terms = tokenize(&searchable_text(video));
            for term in &terms {
                index
                    .postings
                    .entry(term.clone())
                    .or_default()
                    .insert(id.clone());
            }
            index.terms_by_video.insert(id.clone(), terms);
        }
        index
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.postings.is_empty()
    }

    #[must_use]
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    #[must_use]
    pub fn postings(&self, term: &str) -> Option<&HashSet<Arc<str>>> {
        self.postings.get(term)
    }

    #[must_use]
    pub fn terms_for(&self, id: &str) -> Option<&HashSet<String>> {
        self.terms_by_video.get(id)
    }

    /// Ids present under **every** query term (AND semantics). A term with no
    /// postings empties the result. The query goes through the same
    /// tokenization rules as indexing.
    #[must_use]
    pub fn matching_ids(&self, query: &str) -> HashSet<Arc<str>> {
        let mut matching: Option<HashSet<Arc<str>>> = None;

        for term in tokenize(query) {
            let Some(ids) = self.postings.get(&term) else {
                return HashSet::new();
            };
            matching = Some(match matching {
                None => ids.clone(),
                Some(current) => current.intersection(ids).cloned().collect(),
            });
        }

        matching.unwrap_or_default()
    }
}
