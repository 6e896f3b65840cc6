use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::state::LoadStage;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("fetch of {url} failed with status {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("{stage} stage failed: {message}")]
    StageFailed { stage: LoadStage, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Serializable error detail carried by `load-error` events.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub stage: LoadStage,
    pub trace_id: String,
}

impl CatalogError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::FetchStatus { .. } => "FETCH_STATUS",
            Self::StageFailed { .. } => "STAGE_FAILED",
            Self::Http(_) => "HTTP_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub fn to_payload(&self, stage: LoadStage) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            stage,
            trace_id: Uuid::new_v4().to_string(),
        }
    }
}
