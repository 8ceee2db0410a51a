//! `notebook-view` command line: lay out a notebook headlessly and print the
//! visible window.

use crate::app::NotebookEditor;
use crate::backend::{spawn_backend, DocumentSource};
use crate::host::HeadlessMeasurer;
use clap::Parser;
use notebook_core::{Config, NotebookError};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "notebook-view", about = "Headless notebook layout viewer", version)]
pub struct ViewArgs {
    /// Notebook JSON file to open
    pub path: PathBuf,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,

    /// Scroll offset applied after the first layout settles
    #[arg(long)]
    pub scroll: Option<f32>,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Frame limit while waiting for layout to settle
    #[arg(long, default_value_t = 32)]
    pub max_frames: usize,
}

/// One rendered row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RowReport {
    pub index: usize,
    pub kind: String,
    pub top: f32,
    pub height: f32,
    pub measured: bool,
    pub editing: bool,
    pub preview: String,
}

/// Snapshot of the list after layout settled.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WindowReport {
    pub cells: usize,
    pub total_height: f32,
    pub scroll_top: f32,
    pub frames: usize,
    pub rows: Vec<RowReport>,
}

impl WindowReport {
    pub fn capture(editor: &NotebookEditor, frames: usize) -> Self {
        let list = editor.list();
        let rows = list
            .rows()
            .iter()
            .filter_map(|row| {
                let index = list.index_of(row.cell())?;
                let cell = editor.cell(row.cell())?;
                let preview = cell
                    .source_lines()
                    .first()
                    .map(|line| line.trim_end().chars().take(40).collect())
                    .unwrap_or_default();
                Some(RowReport {
                    index,
                    kind: cell.kind().as_str().to_string(),
                    top: list.item_top(index),
                    height: list.item_height(index).unwrap_or(0.0),
                    measured: !cell.has_pending_measurement(),
                    editing: cell.is_editing(),
                    preview,
                })
            })
            .collect();
        Self {
            cells: editor.cells().len(),
            total_height: list.total_height(),
            scroll_top: list.scroll_top(),
            frames,
            rows,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{} cells, total height {:.0}px, scroll {:.0}px, settled after {} frames\n",
            self.cells, self.total_height, self.scroll_top, self.frames
        );
        for row in &self.rows {
            out.push_str(&format!(
                "#{:<4} {:<8} top {:>7.0} height {:>6.0}{}{}  {}\n",
                row.index,
                row.kind,
                row.top,
                row.height,
                if row.measured { "" } else { " (estimate)" },
                if row.editing { " [editing]" } else { "" },
                row.preview
            ));
        }
        out
    }
}

/// Open `args.path`, settle layout, apply the optional scroll, and report.
///
/// # Errors
/// Returns the resolution error when the notebook cannot be loaded, or
/// [`NotebookError::Serialization`] when JSON output fails.
pub fn render_window(args: &ViewArgs, config: Config) -> Result<String, NotebookError> {
    let measurer = HeadlessMeasurer::new(config.line_height);
    let mut editor = NotebookEditor::new(config, spawn_backend());
    editor.layout(args.width, args.height);
    editor.set_input_blocking(DocumentSource::Path(args.path.clone()))?;
    let mut frames = editor.run_until_settled(&measurer, args.max_frames);
    if let Some(top) = args.scroll {
        editor.scroll_to(top);
        frames += editor.run_until_settled(&measurer, args.max_frames);
    }
    let report = WindowReport::capture(&editor, frames);
    editor.on_hide();
    if args.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(report.to_text())
    }
}

/// Process exit status for a failed run.
///
/// `2` means the notebook itself could not be read or parsed, `3` means the
/// resolver thread never answered, and `1` covers everything else.
pub fn exit_code(err: &NotebookError) -> u8 {
    match err {
        NotebookError::Resolve(_) | NotebookError::Io(_) => 2,
        NotebookError::Timeout | NotebookError::BackendUnavailable => 3,
        _ => 1,
    }
}
