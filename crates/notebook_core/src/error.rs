//! Error type shared by the document model and the view core.
use crate::models::CellId;
use thiserror::Error;

/// Top-level notebook error type.
#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cell not found: {0}")]
    CellNotFound(CellId),

    #[error("Index {index} out of bounds for {len} cells")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Document resolution failed: {0}")]
    Resolve(String),

    #[error("Backend unavailable")]
    BackendUnavailable,

    #[error("Timed out waiting for the backend")]
    Timeout,
}
