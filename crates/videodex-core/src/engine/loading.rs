use std::sync::{Arc, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};
use crate::events::CatalogEvent;
use crate::index::SearchIndex;
use crate::models::{Catalog, CategoriesDocument, VideosDocument};
use crate::state::LoadStage;

use super::{CatalogEngine, EngineState, InitOutcome, InitialView, StageFailure, VideoStageStatus};

/// Result of the category stage with its side effects still pending: the
/// events to deliver and the background continuation to start once the memo
/// lock is no longer held.
struct StagedInit {
    outcome: InitOutcome,
    events: Vec<CatalogEvent>,
    spawn_generation: Option<u64>,
}

impl CatalogEngine {
    /// Starts the staged load. Single-flight: the first caller performs the
    /// category fetch, concurrent callers block on the same in-flight
    /// attempt, and every later call returns the memoized outcome without
    /// touching the network again.
    ///
    /// Lifecycle events fire after the outcome is memoized and the memo lock
    /// released, so a subscriber callback may call back into the engine
    /// (including `initialize()` itself) without deadlocking.
    ///
    /// On success the returned view already carries the parsed hierarchy;
    /// the video stage keeps running on a background thread and reports only
    /// through the event channel and [`Self::wait_until_videos_ready`].
    pub fn initialize(&self) -> Result<InitialView> {
        let staged = {
            let mut memo = self
                .init
                .lock()
                .map_err(|_| CatalogError::Internal("init lock poisoned".to_string()))?;

            if let Some(outcome) = memo.as_ref() {
                return outcome.clone().map_err(Into::into);
            }

            let staged = self.run_category_stage();
            *memo = Some(staged.outcome.clone());
            staged
        };
        self.settle_category_stage(staged)
    }

    /// Discards the session and runs the staged load again. The generation
    /// bump makes any still-running background stage from the previous
    /// session publish nowhere.
    pub fn reinitialize(&self) -> Result<InitialView> {
        let staged = {
            let mut memo = self
                .init
                .lock()
                .map_err(|_| CatalogError::Internal("init lock poisoned".to_string()))?;

            let next_generation = {
                let mut state = self.write_state();
                let next = state.generation + 1;
                *state = EngineState {
                    generation: next,
                    ..EngineState::default()
                };
                next
            };
            {
                let mut signal = self
                    .video_stage
                    .state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                *signal = (next_generation, VideoStageStatus::Pending);
            }

            let staged = self.run_category_stage();
            *memo = Some(staged.outcome.clone());
            staged
        };
        self.settle_category_stage(staged)
    }

    /// Blocks until the background video stage settles or the timeout
    /// elapses. Returns true only when the catalog and index are live.
    pub fn wait_until_videos_ready(&self, timeout: Duration) -> bool {
        let guard = self
            .video_stage
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .video_stage
            .condvar
            .wait_timeout_while(guard, timeout, |(_, status)| {
                *status == VideoStageStatus::Pending
            })
            .unwrap_or_else(PoisonError::into_inner);
        guard.1 == VideoStageStatus::Ready
    }

    fn run_category_stage(&self) -> StagedInit {
        let mut events = vec![CatalogEvent::LoadStart];
        let generation = {
            let mut state = self.write_state();
            state.loader.begin_categories();
            state.generation
        };
        debug!(url = %self.config.categories_url(), "loading categories");

        match self.fetch_categories() {
            Ok(doc) => {
                let categories = Arc::new(doc);
                {
                    let mut state = self.write_state();
                    state.categories = Some(categories.clone());
                    state.loader.categories_ready();
                }
                info!(
                    total_categories = categories.metadata.total_categories,
                    "categories ready"
                );
                events.push(CatalogEvent::CategoriesReady {
                    categories: categories.clone(),
                });
                StagedInit {
                    outcome: Ok(InitialView {
                        categories,
                        videos_loading: true,
                    }),
                    events,
                    spawn_generation: Some(generation),
                }
            }
            Err(err) => {
                let payload = err.to_payload(LoadStage::Categories);
                warn!(code = payload.code.as_str(), "category stage failed: {err}");
                self.write_state()
                    .loader
                    .fail(LoadStage::Categories, payload.clone());
                events.push(CatalogEvent::LoadError { payload });
                StagedInit {
                    outcome: Err(StageFailure {
                        stage: LoadStage::Categories,
                        message: err.to_string(),
                    }),
                    events,
                    spawn_generation: None,
                }
            }
        }
    }

    /// Delivers the stage's events and starts the background continuation.
    /// Runs only once the memo lock is released; spawning after the
    /// categories-ready event keeps the video stage's events ordered behind
    /// it.
    fn settle_category_stage(&self, staged: StagedInit) -> Result<InitialView> {
        for event in &staged.events {
            self.events.emit(event);
        }
        if let Some(generation) = staged.spawn_generation {
            self.spawn_video_stage(generation);
        }
        staged.outcome.map_err(Into::into)
    }

    fn spawn_video_stage(&self, generation: u64) {
        let engine = self.clone();
        std::thread::spawn(move || engine.run_video_stage(generation));
    }

    /// Background continuation: fetch the videos document, validate it into
    /// a catalog, build the index once, publish everything under the write
    /// lock. Failure here never fails `initialize()` retroactively; it is
    /// reported via the event channel and leaves the session unindexed.
    fn run_video_stage(&self, generation: u64) {
        {
            let mut state = self.write_state();
            if state.generation != generation {
                return;
            }
            state.loader.begin_videos();
        }
        self.events.emit(&CatalogEvent::VideosLoadStart);
        debug!(url = %self.config.videos_url(), "loading videos");

        match self.fetch_videos() {
            Ok(doc) => {
                let explicit_order = !doc.video_order.is_empty();
                let catalog = Catalog::from_document(doc);
                let index = SearchIndex::build(&catalog);
                let count = catalog.len();
                let term_count = index.term_count();

                {
                    let mut state = self.write_state();
                    if state.generation != generation {
                        return;
                    }
                    state.catalog = catalog;
                    state.loader.videos_ready();
                    if index.is_ready() {
                        state.loader.mark_search_ready();
                    }
                    state.index = index;
                }
                info!(count, term_count, explicit_order, "videos ready");
                self.events.emit(&CatalogEvent::VideosReady {
                    count,
                    explicit_order,
                });
                self.events
                    .emit(&CatalogEvent::SearchIndexReady { term_count });
                self.signal_video_stage(generation, VideoStageStatus::Ready);
            }
            Err(err) => {
                let payload = err.to_payload(LoadStage::Videos);
                warn!(code = payload.code.as_str(), "video stage failed: {err}");
                {
                    let mut state = self.write_state();
                    if state.generation != generation {
                        return;
                    }
                    state.loader.fail(LoadStage::Videos, payload.clone());
                }
                self.events.emit(&CatalogEvent::LoadError { payload });
                self.signal_video_stage(generation, VideoStageStatus::Failed);
            }
        }
    }

    fn signal_video_stage(&self, generation: u64, status: VideoStageStatus) {
        let mut signal = self
            .video_stage
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if signal.0 != generation {
            return;
        }
        signal.1 = status;
        self.video_stage.condvar.notify_all();
    }

    fn fetch_categories(&self) -> Result<CategoriesDocument> {
        let value = self.fetcher.fetch_json(&self.config.categories_url())?;
        Ok(serde_json::from_value(value)?)
    }

    fn fetch_videos(&self) -> Result<VideosDocument> {
        let value = self.fetcher.fetch_json(&self.config.videos_url())?;
        Ok(serde_json::from_value(value)?)
    }

    pub(super) fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, EngineState> {
        // Published structures are replaced whole under this lock and never
        // mutated in place afterwards, so recovering from poisoning cannot
        // expose a half-built index.
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
