use std::sync::{Arc, PoisonError, RwLockReadGuard};

use tracing::warn;

use crate::category::matches_category;
use crate::error::ErrorPayload;
use crate::models::{CategoriesDocument, VideoRecord};
use crate::state::{LoadPhase, LoadStage};

use super::{CatalogEngine, EngineState};

impl CatalogEngine {
    /// O(1) record lookup. `None` for unknown ids, never an error.
    #[must_use]
    pub fn get_video(&self, id: &str) -> Option<VideoRecord> {
        self.read_state().catalog.get(id).cloned()
    }

    /// The catalog in canonical display order, dangling ids dropped. Empty
    /// until the video stage completes.
    #[must_use]
    pub fn ordered_videos(&self) -> Vec<VideoRecord> {
        self.read_state().catalog.ordered_records().cloned().collect()
    }

    #[must_use]
    pub fn total_video_count(&self) -> usize {
        self.read_state().catalog.len()
    }

    /// The parsed hierarchy, present from the moment `initialize()` resolves.
    #[must_use]
    pub fn categories(&self) -> Option<Arc<CategoriesDocument>> {
        self.read_state().categories.clone()
    }

    #[must_use]
    pub fn is_videos_loaded(&self) -> bool {
        self.read_state().loader.is_videos_loaded()
    }

    #[must_use]
    pub fn is_search_ready(&self) -> bool {
        self.read_state().loader.is_search_ready()
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.read_state().loader.phase()
    }

    #[must_use]
    pub fn last_error(&self, stage: LoadStage) -> Option<ErrorPayload> {
        self.read_state().loader.last_error(stage).cloned()
    }

    /// Category filter over the canonical order. An absent or blank path
    /// means "no filter".
    #[must_use]
    pub fn filter_by_category(&self, path: Option<&str>) -> Vec<VideoRecord> {
        let state = self.read_state();
        filter_in_state(&state, normalize_path(path))
    }

    /// Full-text search with multi-term AND semantics, optionally constrained
    /// to a category, results always re-sorted into canonical order.
    ///
    /// A blank query is the "no active search" fast path: it degenerates to
    /// the category filter. Before the index is ready the query degrades to a
    /// linear substring scan instead of erroring.
    #[must_use]
    pub fn search_videos(&self, query: &str, within_category: Option<&str>) -> Vec<VideoRecord> {
        let trimmed = query.trim();
        let within = normalize_path(within_category);
        if trimmed.is_empty() {
            let state = self.read_state();
            return filter_in_state(&state, within);
        }

        let state = self.read_state();
        if !state.loader.is_search_ready() {
            warn!("search index not ready, falling back to linear scan");
            return linear_scan(&state, trimmed, within);
        }

        let ids = state.index.matching_ids(trimmed);
        let mut hits: Vec<&VideoRecord> = ids
            .iter()
            .filter_map(|id| state.catalog.get(id.as_ref()))
            .filter(|video| {
                within.is_none_or(|path| {
                    matches_category(&video.category_data.exact_paths, path)
                })
            })
            .collect();
        hits.sort_by_key(|video| state.catalog.position(&video.id).unwrap_or(usize::MAX));
        hits.into_iter().cloned().collect()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, EngineState> {
        // Same recovery rationale as `write_state`: contents are only ever
        // replaced whole, never mutated in place.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn normalize_path(path: Option<&str>) -> Option<&str> {
    path.map(str::trim).filter(|path| !path.is_empty())
}

fn filter_in_state(state: &EngineState, path: Option<&str>) -> Vec<VideoRecord> {
    state
        .catalog
        .ordered_records()
        .filter(|video| {
            path.is_none_or(|path| matches_category(&video.category_data.exact_paths, path))
        })
        .cloned()
        .collect()
}

/// Pre-index fallback: case-insensitive substring match over title, tags,
/// and flattened category names (OR across fields), canonical order kept.
fn linear_scan(state: &EngineState, query: &str, within: Option<&str>) -> Vec<VideoRecord> {
    let needle = query.to_lowercase();
    state
        .catalog
        .ordered_records()
        .filter(|video| {
            within.is_none_or(|path| matches_category(&video.category_data.exact_paths, path))
        })
        .filter(|video| record_contains(video, &needle))
        .cloned()
        .collect()
}

fn record_contains(video: &VideoRecord, needle: &str) -> bool {
    if video.title.to_lowercase().contains(needle) {
        return true;
    }
    if video
        .search_tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(needle))
    {
        return true;
    }
    video
        .category_data
        .flat_categories
        .iter()
        .any(|name| name.to_lowercase().contains(needle))
}
