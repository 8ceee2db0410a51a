//! Per-cell view state wrapping one backing record.

use super::edit_buffer::EditBuffer;
use crate::host::MarkdownRenderer;
use notebook_core::text::join_lines;
use notebook_core::{
    CellId, CellKind, CellRecord, NotebookDocument, OutputRecord, CELL_CHROME_MARGIN,
    MARKDOWN_PLACEHOLDER_HEIGHT, MIN_CODE_CELL_LINES,
};

/// View-side state for one displayed cell.
///
/// Shares its identity with the backing record it wraps. Source lines are a
/// working copy; outputs are always read through the backing document.
#[derive(Debug)]
pub struct ViewCell {
    id: CellId,
    kind: CellKind,
    language: Option<String>,
    source: Vec<String>,
    editing: bool,
    rendered_html: Option<String>,
    measured_height: Option<f32>,
    edit_buffer: Option<EditBuffer>,
}

impl ViewCell {
    /// Wrap a backing record. `language` applies to code cells only.
    pub fn from_record(record: &CellRecord, language: Option<String>) -> Self {
        Self {
            id: record.id,
            kind: record.kind,
            language: match record.kind {
                CellKind::Code => language,
                CellKind::Markdown => None,
            },
            source: record.source.clone(),
            editing: false,
            rendered_html: None,
            measured_height: None,
            edit_buffer: None,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source
    }

    /// Outputs of the backing record.
    pub fn outputs<'d>(&self, document: Option<&'d NotebookDocument>) -> &'d [OutputRecord] {
        document
            .and_then(|document| document.cell(self.id))
            .map(|record| record.outputs.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    /// Layout height: the latched measurement, else a heuristic estimate.
    pub fn height(&self, line_height: f32) -> f32 {
        if let Some(measured) = self.measured_height {
            return measured;
        }
        match self.kind {
            CellKind::Markdown => MARKDOWN_PLACEHOLDER_HEIGHT,
            CellKind::Code => {
                let slots = (self.source.len() + 1).max(MIN_CODE_CELL_LINES);
                slots as f32 * line_height + CELL_CHROME_MARGIN
            }
        }
    }

    /// True until the first real measurement is latched; never true again after.
    pub fn has_pending_measurement(&self) -> bool {
        self.measured_height.is_none()
    }

    pub(crate) fn latch_measured_height(&mut self, height: f32) {
        self.measured_height = Some(height);
    }

    /// Replace the working source. Drops the rendered markdown cache but keeps
    /// any latched measurement.
    pub fn set_text(&mut self, lines: Vec<String>) {
        self.source = lines;
        self.rendered_html = None;
    }

    /// Flush the mounted edit buffer into the working source.
    ///
    /// The buffer stays alive until the cell is disposed.
    ///
    /// # Returns
    /// `true` when the source changed.
    pub fn save(&mut self) -> bool {
        if !self.editing {
            return false;
        }
        let Some(buffer) = self.edit_buffer.as_ref() else {
            return false;
        };
        let lines = buffer.lines();
        if lines == self.source {
            return false;
        }
        self.set_text(lines);
        true
    }

    pub fn text(&self) -> String {
        join_lines(&self.source)
    }

    /// Rendered HTML for markdown cells, cached until the text changes.
    /// Code cells have no rendered form.
    pub fn rendered_content(&mut self, renderer: &dyn MarkdownRenderer) -> Option<&str> {
        if self.kind != CellKind::Markdown {
            return None;
        }
        if self.rendered_html.is_none() {
            self.rendered_html = Some(renderer.render(&self.text()));
        }
        self.rendered_html.as_deref()
    }

    /// The cell's edit buffer, created from the current text on first use.
    pub fn edit_buffer(&mut self) -> &mut EditBuffer {
        let Self {
            id,
            kind,
            language,
            source,
            edit_buffer,
            ..
        } = self;
        edit_buffer.get_or_insert_with(|| {
            EditBuffer::new(*kind, *id, language.clone(), &join_lines(source))
        })
    }

    /// The edit buffer if one has been created.
    pub fn existing_buffer(&self) -> Option<&EditBuffer> {
        self.edit_buffer.as_ref()
    }

    /// Release the edit buffer. Called when the cell is torn down.
    ///
    /// # Returns
    /// `true` when a buffer was released.
    pub(crate) fn dispose(&mut self) -> bool {
        self.edit_buffer.take().is_some()
    }
}
