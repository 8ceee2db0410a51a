//! Backing document records and the in-memory document model.

mod cell;
mod document;

pub use cell::{CellId, CellKind, CellRecord, OutputRecord};
pub use document::{DocumentId, NotebookDocument, NotebookMetadata};
