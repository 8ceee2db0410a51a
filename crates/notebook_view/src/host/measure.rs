//! Headless stand-in for a real renderer: derives node heights from content.
//!
//! Text is wrapped at the viewport width in fixed-width columns, counting
//! display width with `unicode-width`.

use super::observer::NodeId;
use super::outputs::strip_tags;
use crate::app::{SlotContent, TemplateSlot, ViewCell};
use unicode_width::UnicodeWidthStr;

fn div_ceil(value: usize, divisor: usize) -> usize {
    if value == 0 {
        0
    } else {
        (value - 1) / divisor + 1
    }
}

/// Wrapped row count for `text` at `cols` columns; at least one row.
fn wrapped_rows(text: &str, cols: usize) -> usize {
    let cols = cols.max(1);
    let rows: usize = text
        .lines()
        .map(|line| {
            let columns = if line.is_ascii() {
                line.len()
            } else {
                UnicodeWidthStr::width(line)
            };
            div_ceil(columns.max(1), cols)
        })
        .sum();
    rows.max(1)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessMeasurer {
    line_height: f32,
    char_width: f32,
}

impl HeadlessMeasurer {
    pub const DEFAULT_CHAR_WIDTH: f32 = 8.0;

    pub fn new(line_height: f32) -> Self {
        Self::with_char_width(line_height, Self::DEFAULT_CHAR_WIDTH)
    }

    pub fn with_char_width(line_height: f32, char_width: f32) -> Self {
        Self {
            line_height: line_height.max(1.0),
            char_width: char_width.max(1.0),
        }
    }

    fn columns(&self, width: f32) -> usize {
        ((width / self.char_width).floor() as usize).max(1)
    }

    fn text_height(&self, text: &str, cols: usize) -> f32 {
        wrapped_rows(text, cols) as f32 * self.line_height
    }

    /// Heights for every node `slot` currently shows for `cell`.
    ///
    /// Editors measure the cell's live buffer when one exists, otherwise its
    /// saved source. Outputs with a fixed height are skipped.
    pub fn measure_slot(
        &self,
        slot: &TemplateSlot,
        cell: &ViewCell,
        width: f32,
    ) -> Vec<(NodeId, f32)> {
        let cols = self.columns(width);
        let editor_text = || match cell.existing_buffer() {
            Some(buffer) => buffer.text(),
            None => cell.text(),
        };
        let mut sizes = Vec::new();
        match slot.content() {
            SlotContent::Markdown(content) => {
                let shown = content.preview.as_deref().or(content.rendered.as_deref());
                let text = shown.map(strip_tags).unwrap_or_default();
                sizes.push((content.content_node, self.text_height(&text, cols)));
                if content.editor.is_some() {
                    sizes.push((content.editor_node, self.text_height(&editor_text(), cols)));
                }
            }
            SlotContent::Code(content) => {
                if content.editor.is_some() {
                    sizes.push((content.editor_node, self.text_height(&editor_text(), cols)));
                }
                for output in content.outputs.iter().filter(|output| output.has_dynamic_height) {
                    let text = output.element.display_text();
                    sizes.push((output.node, self.text_height(&text, cols)));
                }
            }
        }
        sizes
    }
}
