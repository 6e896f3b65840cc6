use std::sync::{Arc, Condvar, Mutex, RwLock};
use std::time::Duration;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::events::{CatalogEvent, EventBus, EventKind};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::index::SearchIndex;
use crate::models::{Catalog, CategoriesDocument};
use crate::state::{LoadStage, LoaderState};

mod loading;
mod queries;

/// The Catalog Index: staged loader, inverted index, and query surface in one
/// cheaply clonable handle. One instance per application session; all shared
/// structures are read-only once the one-shot build has published them.
#[derive(Clone)]
pub struct CatalogEngine {
    config: CatalogConfig,
    fetcher: Arc<dyn Fetcher>,
    events: Arc<EventBus>,
    state: Arc<RwLock<EngineState>>,
    init: Arc<Mutex<Option<InitOutcome>>>,
    video_stage: Arc<VideoStageSignal>,
}

impl std::fmt::Debug for CatalogEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEngine")
            .field("data_base_url", &self.config.data_base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct EngineState {
    generation: u64,
    loader: LoaderState,
    categories: Option<Arc<CategoriesDocument>>,
    catalog: Catalog,
    index: SearchIndex,
}

/// What `initialize()` resolves to: the parsed hierarchy, with the video
/// stage still running in the background.
#[derive(Debug, Clone)]
pub struct InitialView {
    pub categories: Arc<CategoriesDocument>,
    pub videos_loading: bool,
}

/// Clonable memo of a settled `initialize()` call.
type InitOutcome = std::result::Result<InitialView, StageFailure>;

#[derive(Debug, Clone)]
struct StageFailure {
    stage: LoadStage,
    message: String,
}

impl From<StageFailure> for CatalogError {
    fn from(failure: StageFailure) -> Self {
        Self::StageFailed {
            stage: failure.stage,
            message: failure.message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum VideoStageStatus {
    #[default]
    Pending,
    Ready,
    Failed,
}

/// Condvar-backed completion signal for the background video stage. The
/// generation guards against a stale thread signalling a reinitialized
/// engine.
#[derive(Default)]
struct VideoStageSignal {
    state: Mutex<(u64, VideoStageStatus)>,
    condvar: Condvar,
}

impl CatalogEngine {
    /// Engine over the default blocking HTTP fetcher.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(Duration::from_millis(config.fetch_timeout_ms))?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Engine over a caller-supplied fetch collaborator (service worker
    /// bridge, cache layer, test fake).
    #[must_use]
    pub fn with_fetcher(config: CatalogConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            events: Arc::new(EventBus::default()),
            state: Arc::new(RwLock::new(EngineState::default())),
            init: Arc::new(Mutex::new(None)),
            video_stage: Arc::new(VideoStageSignal::default()),
        }
    }

    /// Registers a lifecycle subscriber for one event kind. Delivery is
    /// synchronous at emit time.
    pub fn on(&self, kind: EventKind, callback: impl Fn(&CatalogEvent) + Send + Sync + 'static) {
        self.events.on(kind, callback);
    }

    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}
