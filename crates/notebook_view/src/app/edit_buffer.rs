//! Rope-backed edit buffers mounted while a cell is being edited.

use notebook_core::text::split_lines_keeping_terminators;
use notebook_core::{CellId, CellKind};
use ropey::Rope;
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BUFFER_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Synthetic identity of an edit buffer.
///
/// The serial keeps two buffers created for the same cell (or for different
/// cells of the same kind) distinguishable by host text services.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId {
    kind: CellKind,
    cell: CellId,
    serial: u64,
}

impl BufferId {
    fn allocate(kind: CellKind, cell: CellId) -> Self {
        Self {
            kind,
            cell,
            serial: NEXT_BUFFER_SERIAL.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn cell(&self) -> CellId {
        self.cell
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "notebook-cell:{}/{}#{}",
            self.kind.as_str(),
            self.cell,
            self.serial
        )
    }
}

/// Live, user-editable text for one cell.
#[derive(Clone, Debug)]
pub struct EditBuffer {
    id: BufferId,
    language: Option<String>,
    rope: Rope,
    revision: u64,
}

impl EditBuffer {
    /// Create a buffer seeded with `text`.
    pub(crate) fn new(kind: CellKind, cell: CellId, language: Option<String>, text: &str) -> Self {
        Self {
            id: BufferId::allocate(kind, cell),
            language,
            rope: Rope::from_str(text),
            revision: 0,
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Language mode the buffer was created with (code cells only).
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Edit counter; bumps on every applied mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of stored lines (at least one). Only `\n` ends a line.
    pub fn line_count(&self) -> usize {
        let breaks: usize = self
            .rope
            .chunks()
            .map(|chunk| chunk.bytes().filter(|byte| *byte == b'\n').count())
            .sum();
        breaks + 1
    }

    /// UTF-8 snapshot of the whole buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Lines in storage form: split on `\n` only, each keeping its terminator.
    ///
    /// Other characters the rope treats as breaks (`\r`, form feed, U+2028)
    /// stay inside their line.
    pub fn lines(&self) -> Vec<String> {
        split_lines_keeping_terminators(&self.rope.to_string())
    }

    /// Replace a char range with new text.
    ///
    /// # Returns
    /// `false` when the request is a no-op (empty range and empty text).
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> bool {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        if start == end && text.is_empty() {
            return false;
        }
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        self.revision = self.revision.wrapping_add(1);
        true
    }

    /// Insert text at a char position.
    pub fn insert(&mut self, char_index: usize, text: &str) -> bool {
        self.replace(char_index..char_index, text)
    }
}
