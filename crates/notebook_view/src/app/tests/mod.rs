//! Editor-level tests that drive structural edits, input switching, and the
//! height feedback loop through the public frame API.

use super::*;
use crate::backend::{BackendHandle, CoreCmd, CoreEvent, DocumentSource, InputId};
use crate::host::HeadlessMeasurer;
use crossbeam_channel::{unbounded, Receiver, Sender};
use notebook_core::{
    CellKind, CellRecord, NotebookDocument, NotebookError, NotebookMetadata, OutputRecord,
};
use serde_json::json;

mod context_menu;
mod layout_flow;

struct TestHarness {
    editor: NotebookEditor,
    cmd_rx: Receiver<CoreCmd>,
    evt_tx: Sender<CoreEvent>,
}

fn make_editor() -> TestHarness {
    make_editor_with(Config::default())
}

fn make_editor_with(config: Config) -> TestHarness {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();
    let backend = BackendHandle::from_test_channels(cmd_tx, evt_rx);
    let mut editor = NotebookEditor::new(config, backend);
    editor.layout(800.0, 4000.0);
    TestHarness {
        editor,
        cmd_rx,
        evt_tx,
    }
}

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|line| line.to_string()).collect()
}

fn code(source: &[&str]) -> CellRecord {
    CellRecord::new(CellKind::Code, lines(source), Vec::new())
}

fn markdown(source: &[&str]) -> CellRecord {
    CellRecord::new(CellKind::Markdown, lines(source), Vec::new())
}

fn stream_output(text: &str) -> OutputRecord {
    OutputRecord(json!({ "output_type": "stream", "name": "stdout", "text": [text] }))
}

fn document(cells: Vec<CellRecord>) -> NotebookDocument {
    NotebookDocument::new(NotebookMetadata::default(), cells)
}

fn numbered_code_cells(count: usize) -> NotebookDocument {
    document(
        (0..count)
            .map(|index| {
                let source = vec![format!("cell_{index} = {index}\n")];
                CellRecord::new(CellKind::Code, source, Vec::new())
            })
            .collect(),
    )
}

impl TestHarness {
    /// Request `document` as the new input without answering it yet.
    fn request(&mut self, document: NotebookDocument) -> InputId {
        self.editor
            .set_input(DocumentSource::Memory(document))
            .expect("set input")
    }

    /// Answer the oldest outstanding command the way the worker would.
    fn answer_next(&self) -> InputId {
        let cmd = self.cmd_rx.try_recv().expect("outstanding command");
        let CoreCmd::ResolveDocument { input, source } = cmd;
        let event = match source {
            DocumentSource::Memory(document) => CoreEvent::DocumentResolved { input, document },
            DocumentSource::Json(raw) => match NotebookDocument::from_json(&raw) {
                Ok(document) => CoreEvent::DocumentResolved { input, document },
                Err(err) => CoreEvent::ResolveFailed {
                    input,
                    message: err.to_string(),
                },
            },
            DocumentSource::Path(path) => CoreEvent::ResolveFailed {
                input,
                message: format!("no disk access in tests: {}", path.display()),
            },
        };
        self.evt_tx.send(event).expect("send event");
        input
    }

    /// Load `document` and run one frame so the window is bound.
    fn load(&mut self, document: NotebookDocument) -> InputId {
        let input = self.request(document);
        self.answer_next();
        let report = self.editor.pump();
        assert_eq!(report.inputs_completed, 1);
        assert_eq!(self.editor.input_status(), &InputStatus::Ready(input));
        input
    }

    fn measure(&mut self) -> usize {
        self.editor.measure_with(&HeadlessMeasurer::new(18.0))
    }

    fn ids(&self) -> Vec<CellId> {
        self.editor.cell_ids()
    }
}

/// The cell array, backing document, and list agree on order.
fn assert_ordering(editor: &NotebookEditor) {
    let view = editor.cell_ids();
    let backing: Vec<CellId> = editor
        .document()
        .map(|document| document.cells().iter().map(|record| record.id).collect())
        .unwrap_or_default();
    assert_eq!(view, backing, "view cells and backing document diverged");
    assert_eq!(view, editor.list().cells(), "view cells and list diverged");
}

/// Every live observation belongs to a currently bound slot.
fn assert_no_leaked_observers(editor: &NotebookEditor) {
    let bound: usize = editor
        .list()
        .rows()
        .iter()
        .map(|row| row.slot().subscription_count())
        .sum();
    assert_eq!(editor.observer().active_observations(), bound);
}
