//! In-memory backing document: the authoritative ordered cell records.

use super::cell::{CellId, CellRecord};
use crate::error::NotebookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// Identity of one loaded document instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document-level settings carried on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    /// Language for code cells; falls back to configuration when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Backing notebook model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookDocument {
    #[serde(skip, default)]
    id: DocumentId,
    #[serde(default)]
    pub metadata: NotebookMetadata,
    #[serde(default)]
    cells: Vec<CellRecord>,
}

impl NotebookDocument {
    /// Build a document from already-constructed records.
    pub fn new(metadata: NotebookMetadata, cells: Vec<CellRecord>) -> Self {
        Self {
            id: DocumentId::new(),
            metadata,
            cells,
        }
    }

    /// Parse a document from its JSON wire form.
    ///
    /// # Errors
    /// Returns [`NotebookError::Serialization`] for malformed JSON or records.
    pub fn from_json(raw: &str) -> Result<Self, NotebookError> {
        let document: Self = serde_json::from_str(raw)?;
        debug!(
            document = %document.id,
            cells = document.cells.len(),
            "parsed notebook document"
        );
        Ok(document)
    }

    /// Read and parse a document file.
    ///
    /// # Errors
    /// Returns [`NotebookError::Io`] when the file cannot be read, or
    /// [`NotebookError::Serialization`] when it does not parse.
    pub fn from_path(path: &Path) -> Result<Self, NotebookError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Serialize to the JSON wire form.
    ///
    /// # Errors
    /// Returns [`NotebookError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, NotebookError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Ordered cell records.
    pub fn cells(&self) -> &[CellRecord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Current position of a record, located by identity.
    pub fn index_of(&self, id: CellId) -> Option<usize> {
        self.cells.iter().position(|cell| cell.id == id)
    }

    pub fn cell(&self, id: CellId) -> Option<&CellRecord> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    /// Insert a record at `index` (`index == len` appends).
    ///
    /// # Errors
    /// Returns [`NotebookError::IndexOutOfBounds`] when `index > len`.
    pub fn insert_cell(&mut self, record: CellRecord, index: usize) -> Result<(), NotebookError> {
        if index > self.cells.len() {
            return Err(NotebookError::IndexOutOfBounds {
                index,
                len: self.cells.len(),
            });
        }
        self.cells.insert(index, record);
        Ok(())
    }

    /// Remove a record located by identity.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] when no record has `id`.
    pub fn delete_cell(&mut self, id: CellId) -> Result<CellRecord, NotebookError> {
        let index = self.index_of(id).ok_or(NotebookError::CellNotFound(id))?;
        Ok(self.cells.remove(index))
    }

    /// Move a record to `to`, interpreted against the list after removal.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] or
    /// [`NotebookError::IndexOutOfBounds`].
    pub fn move_cell(&mut self, id: CellId, to: usize) -> Result<(), NotebookError> {
        let from = self.index_of(id).ok_or(NotebookError::CellNotFound(id))?;
        if to >= self.cells.len() {
            return Err(NotebookError::IndexOutOfBounds {
                index: to,
                len: self.cells.len(),
            });
        }
        let record = self.cells.remove(from);
        self.cells.insert(to, record);
        Ok(())
    }

    /// Replace a record's source lines.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] when no record has `id`.
    pub fn update_source(&mut self, id: CellId, lines: Vec<String>) -> Result<(), NotebookError> {
        let record = self
            .cells
            .iter_mut()
            .find(|cell| cell.id == id)
            .ok_or(NotebookError::CellNotFound(id))?;
        record.source = lines;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellKind;
    use std::io::Write;

    const SAMPLE: &str = r##"{
        "metadata": { "language": "rust" },
        "cells": [
            { "kind": "markdown", "source": ["# Title\n", "body"] },
            {
                "kind": "code",
                "source": ["let x = 1;\r\n", "x"],
                "outputs": [{ "output_type": "stream", "text": ["1\n"] }]
            }
        ]
    }"##;

    #[test]
    fn parses_wire_shape_and_round_trips() {
        let document = NotebookDocument::from_json(SAMPLE).expect("parse");
        assert_eq!(document.len(), 2);
        assert_eq!(document.metadata.language.as_deref(), Some("rust"));
        assert_eq!(document.cells()[1].source[0], "let x = 1;\r\n");
        assert_eq!(document.cells()[1].outputs.len(), 1);

        let encoded = document.to_json().expect("encode");
        let again = NotebookDocument::from_json(&encoded).expect("reparse");
        assert_eq!(again.cells()[0].text(), "# Title\nbody");
        assert_ne!(again.id(), document.id());
    }

    #[test]
    fn from_path_reads_files_and_reports_missing_ones() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("nb.json");
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(SAMPLE.as_bytes()).expect("write");

        assert_eq!(NotebookDocument::from_path(&path).expect("load").len(), 2);
        let missing = NotebookDocument::from_path(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(NotebookError::Io(_))));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let result = NotebookDocument::from_json("{ \"cells\": [ { \"kind\": \"raw\" } ] }");
        assert!(matches!(result, Err(NotebookError::Serialization(_))));
    }

    #[test]
    fn identity_based_insert_delete_and_move() {
        let mut document = NotebookDocument::default();
        let a = CellRecord::empty(CellKind::Code);
        let b = CellRecord::empty(CellKind::Markdown);
        let (a_id, b_id) = (a.id, b.id);
        document.insert_cell(a, 0).expect("insert a");
        document.insert_cell(b, 0).expect("insert b");
        assert_eq!(document.index_of(a_id), Some(1));

        let err = document.insert_cell(CellRecord::empty(CellKind::Code), 9);
        assert!(matches!(
            err,
            Err(NotebookError::IndexOutOfBounds { index: 9, len: 2 })
        ));

        document.move_cell(a_id, 0).expect("move");
        assert_eq!(document.index_of(b_id), Some(1));

        document.delete_cell(b_id).expect("delete");
        assert!(matches!(
            document.delete_cell(b_id),
            Err(NotebookError::CellNotFound(id)) if id == b_id
        ));
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn update_source_replaces_lines() {
        let record = CellRecord::new(CellKind::Code, vec!["a".into()], Vec::new());
        let id = record.id;
        let mut document = NotebookDocument::new(NotebookMetadata::default(), vec![record]);
        document
            .update_source(id, vec!["b\n".into(), "c".into()])
            .expect("update");
        assert_eq!(document.cell(id).map(CellRecord::text).as_deref(), Some("b\nc"));
    }
}
