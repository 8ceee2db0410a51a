//! Headless integration tests for editor/backend workflows against notebook files.

use notebook_core::{CellKind, Config, NotebookDocument, NotebookError};
use notebook_view::app::{ContextAction, InputStatus, InsertDirection};
use notebook_view::backend::{spawn_backend, DocumentSource};
use notebook_view::cli::{render_window, ViewArgs};
use notebook_view::host::HeadlessMeasurer;
use notebook_view::NotebookEditor;
use std::path::Path;
use tempfile::TempDir;

const NOTEBOOK: &str = r##"{
    "metadata": { "language": "python" },
    "cells": [
        { "kind": "markdown", "source": ["# Analysis\n", "\n", "Loads the data.\n"] },
        {
            "kind": "code",
            "source": ["import math\n", "print(math.pi)\n"],
            "outputs": [
                { "output_type": "stream", "name": "stdout", "text": ["3.141592653589793\n"] }
            ]
        },
        { "kind": "code", "source": ["x = 1\n"], "outputs": [] }
    ]
}"##;

fn write_notebook(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write notebook");
    path
}

fn test_config() -> Config {
    Config {
        resolve_timeout_ms: 2000,
        ..Config::default()
    }
}

#[test]
fn open_settle_edit_and_save_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_notebook(dir.path(), "analysis.json", NOTEBOOK);

    let mut editor = NotebookEditor::new(test_config(), spawn_backend());
    editor.layout(640.0, 480.0);
    editor
        .set_input_blocking(DocumentSource::Path(path.clone()))
        .expect("open notebook");
    assert!(matches!(editor.input_status(), InputStatus::Ready(_)));
    assert_eq!(editor.cells().len(), 3);
    assert_eq!(editor.list().rows().len(), 3);

    let measurer = HeadlessMeasurer::new(editor.config().line_height);
    let frames = editor.run_until_settled(&measurer, 16);
    assert!(frames < 16);
    assert!(editor.cells().iter().all(|cell| !cell.has_pending_measurement()));

    let code = editor.cell_ids()[2];
    editor.edit_cell(code, 4..5, "2").expect("edit");
    let inserted = editor
        .insert_empty_cell(code, CellKind::Code, InsertDirection::Below)
        .expect("insert");
    assert_eq!(editor.cell_ids()[3], inserted);

    editor.on_hide();
    let saved = editor.document().expect("document").to_json().expect("json");
    std::fs::write(&path, saved).expect("write back");

    let reloaded = NotebookDocument::from_path(&path).expect("reload");
    assert_eq!(reloaded.len(), 4);
    assert_eq!(reloaded.cells()[2].source, vec!["x = 2\n".to_string()]);
    assert!(reloaded.cells()[3].source.is_empty());
    assert_eq!(reloaded.metadata.language.as_deref(), Some("python"));
}

#[test]
fn broken_notebook_leaves_the_open_one_in_place() {
    let dir = TempDir::new().expect("temp dir");
    let good = write_notebook(dir.path(), "good.json", NOTEBOOK);
    let bad = write_notebook(
        dir.path(),
        "bad.json",
        r#"{ "cells": [ { "kind": "spreadsheet" } ] }"#,
    );

    let mut editor = NotebookEditor::new(test_config(), spawn_backend());
    editor.layout(640.0, 480.0);
    editor
        .set_input_blocking(DocumentSource::Path(good))
        .expect("open good");
    let ids = editor.cell_ids();

    let err = editor
        .set_input_blocking(DocumentSource::Path(bad))
        .expect_err("bad notebook");
    assert!(matches!(err, NotebookError::Resolve(_)));
    assert_eq!(editor.cell_ids(), ids);
    assert_eq!(editor.list().rows().len(), 3);
}

#[test]
fn context_menu_edits_flow_through_frames() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_notebook(dir.path(), "menu.json", NOTEBOOK);
    let mut editor = NotebookEditor::new(test_config(), spawn_backend());
    editor.layout(640.0, 480.0);
    editor
        .set_input_blocking(DocumentSource::Path(path))
        .expect("open");
    let first = editor.cell_ids()[0];

    let actions = editor.open_context_menu(first).expect("menu");
    let insert = ContextAction::Insert {
        kind: CellKind::Markdown,
        direction: InsertDirection::Above,
    };
    assert!(actions.contains(&insert));
    editor.choose_context_action(first, insert).expect("choose");
    let report = editor.pump();
    assert_eq!(report.edits_applied, 1);
    assert_eq!(editor.cell_ids()[1], first);
    assert!(editor.cells()[0].is_editing());
}

#[test]
fn cli_report_lists_the_visible_window() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_notebook(dir.path(), "cli.json", NOTEBOOK);
    let args = ViewArgs {
        path,
        width: 640.0,
        height: 480.0,
        scroll: None,
        json: false,
        max_frames: 16,
    };

    let text = render_window(&args, test_config()).expect("render");
    assert!(text.starts_with("3 cells"), "unexpected report: {text}");
    assert!(text.contains("markdown"));
    assert!(text.contains("import math"));
    assert!(!text.contains("(estimate)"));

    let json = render_window(&ViewArgs { json: true, ..args }, test_config()).expect("render json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json report");
    assert_eq!(value["cells"], 3);
    assert_eq!(value["rows"].as_array().map(Vec::len), Some(3));
}
