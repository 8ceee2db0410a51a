//! Core domain library for the notebook view (config, document model, text).

/// Configuration loading and defaults.
pub mod config;
/// Layout and configuration constants.
pub mod constants;
/// Process-global environment mutation helpers.
pub mod env;
/// Notebook error type.
pub mod error;
/// Backing document model and cell records.
pub mod models;
/// Line splitting helpers that keep terminators.
pub mod text;

pub use config::Config;
pub use constants::*;
pub use error::NotebookError;
pub use models::{
    CellId, CellKind, CellRecord, DocumentId, NotebookDocument, NotebookMetadata, OutputRecord,
};
