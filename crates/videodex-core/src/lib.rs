// Public fallible APIs in this crate share one concrete error contract (`CatalogError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod fetch;
pub mod index;
pub mod models;
pub mod state;
pub mod tokenizer;

pub use config::CatalogConfig;
pub use engine::{CatalogEngine, InitialView};
pub use error::{CatalogError, Result};
pub use events::{CatalogEvent, EventKind};
pub use state::{LoadPhase, LoadStage};
