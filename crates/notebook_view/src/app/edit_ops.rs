//! Structural edits applied across the cell array, backing document, and list.
//!
//! Every edit locates cells by identity at the moment it runs. Positions are
//! never cached between requests.

use super::delegate::RenderContext;
use super::view_cell::ViewCell;
use super::virtual_list::VirtualList;
use super::NotebookEditor;
use notebook_core::{CellId, CellKind, CellRecord, NotebookError};
use std::ops::Range;
use tracing::{debug, warn};

/// Where a new cell lands relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InsertDirection {
    Above,
    Below,
}

impl InsertDirection {
    /// Insertion index for an anchor currently at `anchor`.
    pub fn index_for(self, anchor: usize) -> usize {
        match self {
            InsertDirection::Above => anchor,
            InsertDirection::Below => anchor + 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Requests raised by delegates and drained by the editor each frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditRequest {
    Insert {
        anchor: CellId,
        kind: CellKind,
        direction: InsertDirection,
    },
    Delete {
        cell: CellId,
    },
    ToggleEditing {
        cell: CellId,
    },
    Move {
        cell: CellId,
        direction: MoveDirection,
    },
}

/// Context-menu entries offered for a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextAction {
    Insert {
        kind: CellKind,
        direction: InsertDirection,
    },
    Delete,
    ToggleEditing,
    Move(MoveDirection),
}

impl ContextAction {
    pub fn label(&self) -> String {
        match self {
            ContextAction::Insert { kind, direction } => {
                let place = match direction {
                    InsertDirection::Above => "above",
                    InsertDirection::Below => "below",
                };
                format!("Insert {} cell {}", kind.as_str(), place)
            }
            ContextAction::Delete => "Delete cell".to_string(),
            ContextAction::ToggleEditing => "Toggle editing".to_string(),
            ContextAction::Move(MoveDirection::Up) => "Move cell up".to_string(),
            ContextAction::Move(MoveDirection::Down) => "Move cell down".to_string(),
        }
    }
}

impl NotebookEditor {
    /// Insert an empty cell next to `anchor`.
    ///
    /// Markdown cells start in edit mode; code cells do not. The new cell goes
    /// into the cell array, the backing document and the list at the same
    /// index, resolved from the anchor's current position.
    ///
    /// # Returns
    /// The new cell's id.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] when the anchor is not in the
    /// backing document. Nothing is inserted in that case.
    pub fn insert_empty_cell(
        &mut self,
        anchor: CellId,
        kind: CellKind,
        direction: InsertDirection,
    ) -> Result<CellId, NotebookError> {
        let Some(anchor_index) = self
            .document
            .as_ref()
            .and_then(|document| document.index_of(anchor))
        else {
            warn!(%anchor, "insert anchor is not in the document");
            return Err(NotebookError::CellNotFound(anchor));
        };
        if self.position(anchor) != Some(anchor_index) {
            warn!(%anchor, "view order diverged from the document");
            return Err(NotebookError::CellNotFound(anchor));
        }
        self.save_all();

        let index = direction.index_for(anchor_index);
        let record = CellRecord::empty(kind);
        let mut cell = ViewCell::from_record(&record, Some(self.code_language()));
        cell.set_editing(kind == CellKind::Markdown);
        let id = cell.id();
        let item = self.list_item(&cell);

        self.cells.insert(index, cell);
        let Some(document) = self.document.as_mut() else {
            self.cells.remove(index);
            return Err(NotebookError::CellNotFound(anchor));
        };
        if let Err(err) = document.insert_cell(record, index) {
            self.cells.remove(index);
            return Err(err);
        }
        self.list.splice(index, 0, vec![item]);
        debug!(cell = %id, %anchor, index, kind = kind.as_str(), "inserted cell");

        self.render_window();
        Ok(id)
    }

    /// Remove `cell` from all three representations and release its buffer.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] when the cell is not displayed.
    pub fn delete_cell(&mut self, cell: CellId) -> Result<(), NotebookError> {
        let index = self.position(cell).ok_or(NotebookError::CellNotFound(cell))?;
        self.save_all();

        let mut removed = self.cells.remove(index);
        let deleted = match self.document.as_mut() {
            Some(document) => document.delete_cell(cell).map(|_| ()),
            None => Err(NotebookError::CellNotFound(cell)),
        };
        if let Err(err) = deleted {
            self.cells.insert(index, removed);
            return Err(err);
        }
        self.list.splice(index, 1, Vec::new());
        removed.dispose();
        debug!(%cell, index, "deleted cell");

        self.render_window();
        Ok(())
    }

    /// Move `cell` one position up or down.
    ///
    /// # Returns
    /// `false` when the cell is already at that edge.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] when the cell is not displayed.
    pub fn move_cell(
        &mut self,
        cell: CellId,
        direction: MoveDirection,
    ) -> Result<bool, NotebookError> {
        let from = self.position(cell).ok_or(NotebookError::CellNotFound(cell))?;
        let to = match direction {
            MoveDirection::Up => from.checked_sub(1),
            MoveDirection::Down => (from + 1 < self.cells.len()).then_some(from + 1),
        };
        let Some(to) = to else {
            return Ok(false);
        };
        self.save_all();

        self.document
            .as_mut()
            .ok_or(NotebookError::CellNotFound(cell))?
            .move_cell(cell, to)?;
        let view = self.cells.remove(from);
        self.cells.insert(to, view);
        let moved = self.list.splice(from, 1, Vec::new());
        self.list.splice(to, 0, moved);
        debug!(%cell, from, to, "moved cell");

        self.render_window();
        Ok(true)
    }

    /// Apply one delegate request.
    ///
    /// # Errors
    /// Propagates the failure of the underlying edit.
    pub fn apply_edit_request(&mut self, request: EditRequest) -> Result<(), NotebookError> {
        match request {
            EditRequest::Insert {
                anchor,
                kind,
                direction,
            } => self.insert_empty_cell(anchor, kind, direction).map(|_| ()),
            EditRequest::Delete { cell } => self.delete_cell(cell),
            EditRequest::ToggleEditing { cell } => {
                let editing = self
                    .cell(cell)
                    .map(ViewCell::is_editing)
                    .ok_or(NotebookError::CellNotFound(cell))?;
                self.set_markdown_editing(cell, !editing)
            }
            EditRequest::Move { cell, direction } => self.move_cell(cell, direction).map(|_| ()),
        }
    }

    /// Replace `range` (in chars) of the cell's edit buffer with `text`.
    ///
    /// Enters edit mode first when needed and refreshes the mounted editor and
    /// any live preview.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] when the cell is not displayed.
    pub fn edit_cell(
        &mut self,
        cell: CellId,
        range: Range<usize>,
        text: &str,
    ) -> Result<(), NotebookError> {
        let index = self.position(cell).ok_or(NotebookError::CellNotFound(cell))?;
        if !self.cells[index].is_editing() {
            match self.cells[index].kind() {
                CellKind::Markdown => self.set_markdown_editing(cell, true)?,
                CellKind::Code => self.cells[index].set_editing(true),
            }
        }
        if !self.cells[index].edit_buffer().replace(range, text) {
            return Ok(());
        }

        let Self {
            list,
            cells,
            delegates,
            observer,
            markdown,
            outputs,
            document,
            ..
        } = self;
        if let Some(slot) = list.slot_for_mut(cell) {
            let view = &mut cells[index];
            let mut ctx = RenderContext {
                observer,
                markdown: &**markdown,
                outputs,
                document: document.as_ref(),
            };
            delegates.for_cell(view).buffer_changed(view, slot, &mut ctx);
        }
        Ok(())
    }

    /// Switch a markdown cell in or out of edit mode. Leaving edit mode saves
    /// the buffer and re-renders the cell. Code cells are left alone.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] when the cell is not displayed.
    pub fn set_markdown_editing(
        &mut self,
        cell: CellId,
        editing: bool,
    ) -> Result<(), NotebookError> {
        let index = self.position(cell).ok_or(NotebookError::CellNotFound(cell))?;
        let view = &self.cells[index];
        if view.kind() != CellKind::Markdown || view.is_editing() == editing {
            return Ok(());
        }
        if !editing {
            self.save_cell(index)?;
        }
        self.cells[index].set_editing(editing);
        self.rerender_cell(cell);
        debug!(%cell, editing, "markdown edit mode changed");
        Ok(())
    }

    /// Flush every cell's buffer into its working source and the backing
    /// document.
    ///
    /// # Returns
    /// How many cells changed.
    pub fn save_all(&mut self) -> usize {
        let mut saved = 0;
        for index in 0..self.cells.len() {
            match self.save_cell(index) {
                Ok(true) => saved += 1,
                Ok(false) => {}
                Err(err) => warn!(cell = %self.cells[index].id(), "save failed: {}", err),
            }
        }
        saved
    }

    fn save_cell(&mut self, index: usize) -> Result<bool, NotebookError> {
        let view = &mut self.cells[index];
        if !view.save() {
            return Ok(false);
        }
        if let Some(document) = self.document.as_mut() {
            document.update_source(view.id(), view.source_lines().to_vec())?;
        }
        Ok(true)
    }

    /// Actions the cell's delegate offers for a context menu.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] when the cell is not displayed.
    pub fn open_context_menu(&self, cell: CellId) -> Result<Vec<ContextAction>, NotebookError> {
        let view = self.cell(cell).ok_or(NotebookError::CellNotFound(cell))?;
        Ok(self.delegates.for_cell(view).context_actions(view))
    }

    /// Hand a context-menu choice to the cell's delegate. The resulting request
    /// is applied on the next frame.
    ///
    /// # Errors
    /// Returns [`NotebookError::CellNotFound`] when the cell is not displayed,
    /// or [`NotebookError::BackendUnavailable`] when the request channel is
    /// closed.
    pub fn choose_context_action(
        &self,
        cell: CellId,
        action: ContextAction,
    ) -> Result<(), NotebookError> {
        let view = self.cell(cell).ok_or(NotebookError::CellNotFound(cell))?;
        self.delegates.for_cell(view).on_context_action(view, action)
    }

    /// Number of cells shown by the list, for consistency checks.
    pub fn list_len(&self) -> usize {
        self.list.len()
    }
}
