use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;

/// The two network stages of the progressive load pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStage {
    Categories,
    Videos,
}

impl LoadStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Videos => "videos",
        }
    }
}

impl std::fmt::Display for LoadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle phase of the staged loader.
///
/// Transitions are monotonic: once a phase is reached the loader never moves
/// backwards except through a full reinitialization, which replaces the whole
/// state. `Errored` is absorbing for the stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    LoadingCategories,
    CategoriesReady,
    LoadingVideos,
    VideosReady,
    Errored(LoadStage),
}

/// Loader bookkeeping: current phase, index readiness, and the most recent
/// error per stage.
#[derive(Debug, Default)]
pub struct LoaderState {
    phase: LoadPhase,
    search_ready: bool,
    category_error: Option<ErrorPayload>,
    video_error: Option<ErrorPayload>,
}

impl LoaderState {
    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_categories_loaded(&self) -> bool {
        !matches!(
            self.phase,
            LoadPhase::Idle | LoadPhase::LoadingCategories | LoadPhase::Errored(LoadStage::Categories)
        )
    }

    #[must_use]
    pub const fn is_videos_loaded(&self) -> bool {
        matches!(self.phase, LoadPhase::VideosReady)
    }

    #[must_use]
    pub const fn is_search_ready(&self) -> bool {
        self.search_ready
    }

    #[must_use]
    pub fn last_error(&self, stage: LoadStage) -> Option<&ErrorPayload> {
        match stage {
            LoadStage::Categories => self.category_error.as_ref(),
            LoadStage::Videos => self.video_error.as_ref(),
        }
    }

    pub(crate) fn begin_categories(&mut self) {
        self.phase = LoadPhase::LoadingCategories;
    }

    pub(crate) fn categories_ready(&mut self) {
        self.phase = LoadPhase::CategoriesReady;
    }

    pub(crate) fn begin_videos(&mut self) {
        self.phase = LoadPhase::LoadingVideos;
    }

    pub(crate) fn videos_ready(&mut self) {
        self.phase = LoadPhase::VideosReady;
    }

    pub(crate) fn mark_search_ready(&mut self) {
        self.search_ready = true;
    }

    pub(crate) fn fail(&mut self, stage: LoadStage, payload: ErrorPayload) {
        self.phase = LoadPhase::Errored(stage);
        match stage {
            LoadStage::Categories => self.category_error = Some(payload),
            LoadStage::Videos => self.video_error = Some(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    fn payload(stage: LoadStage) -> ErrorPayload {
        CatalogError::StageFailed {
            stage,
            message: "boom".to_string(),
        }
        .to_payload(stage)
    }

    #[test]
    fn fresh_state_is_idle_and_unready() {
        let state = LoaderState::default();
        assert_eq!(state.phase(), LoadPhase::Idle);
        assert!(!state.is_categories_loaded());
        assert!(!state.is_videos_loaded());
        assert!(!state.is_search_ready());
    }

    #[test]
    fn happy_path_reaches_videos_ready() {
        let mut state = LoaderState::default();
        state.begin_categories();
        assert!(!state.is_categories_loaded());
        state.categories_ready();
        assert!(state.is_categories_loaded());
        state.begin_videos();
        state.videos_ready();
        state.mark_search_ready();
        assert!(state.is_videos_loaded());
        assert!(state.is_search_ready());
    }

    #[test]
    fn failure_records_error_for_its_stage_only() {
        let mut state = LoaderState::default();
        state.categories_ready();
        state.begin_videos();
        state.fail(LoadStage::Videos, payload(LoadStage::Videos));

        assert_eq!(state.phase(), LoadPhase::Errored(LoadStage::Videos));
        assert!(state.last_error(LoadStage::Videos).is_some());
        assert!(state.last_error(LoadStage::Categories).is_none());
        assert!(!state.is_videos_loaded());
    }

    #[test]
    fn video_stage_failure_leaves_categories_usable() {
        let mut state = LoaderState::default();
        state.categories_ready();
        state.fail(LoadStage::Videos, payload(LoadStage::Videos));
        assert!(state.is_categories_loaded());
    }
}
