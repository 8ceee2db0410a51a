//! Backend worker wiring.
//!
//! This module exposes the command/event protocol plus the worker spawn helper
//! used by the editor's frame loop.

mod protocol;
mod worker;

pub use protocol::{CoreCmd, CoreEvent, DocumentSource, InputId};
pub use worker::{spawn_backend, BackendHandle};

#[cfg(test)]
mod tests {
    use super::*;
    use notebook_core::{CellKind, CellRecord, NotebookDocument, NotebookMetadata};
    use std::time::Duration;
    use tempfile::TempDir;

    fn recv_event(rx: &crossbeam_channel::Receiver<CoreEvent>) -> CoreEvent {
        rx.recv_timeout(Duration::from_secs(2))
            .expect("expected backend event")
    }

    #[test]
    fn backend_resolves_documents_from_disk() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("demo.ipynb");
        std::fs::write(
            &path,
            r##"{"cells":[
                {"kind":"markdown","source":["# Title\n"]},
                {"kind":"code","source":["x = 1\n","x\n"],"outputs":[]}
            ]}"##,
        )
        .expect("write notebook");

        let backend = spawn_backend();
        let input = InputId::next();
        backend
            .cmd_tx
            .send(CoreCmd::ResolveDocument {
                input,
                source: DocumentSource::Path(path),
            })
            .expect("send resolve");

        match recv_event(&backend.evt_rx) {
            CoreEvent::DocumentResolved {
                input: got,
                document,
            } => {
                assert_eq!(got, input);
                assert_eq!(document.len(), 2);
                assert_eq!(document.cells()[1].kind, CellKind::Code);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn backend_reports_parse_and_io_failures() {
        let backend = spawn_backend();
        let bad_json = InputId::next();
        backend
            .cmd_tx
            .send(CoreCmd::ResolveDocument {
                input: bad_json,
                source: DocumentSource::Json("{not json".to_string()),
            })
            .expect("send bad json");
        match recv_event(&backend.evt_rx) {
            CoreEvent::ResolveFailed { input, message } => {
                assert_eq!(input, bad_json);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let missing = InputId::next();
        backend
            .cmd_tx
            .send(CoreCmd::ResolveDocument {
                input: missing,
                source: DocumentSource::Path("/definitely/not/here.ipynb".into()),
            })
            .expect("send missing");
        match recv_event(&backend.evt_rx) {
            CoreEvent::ResolveFailed { input, .. } => assert_eq!(input, missing),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn memory_documents_keep_their_identity() {
        let document = NotebookDocument::new(
            NotebookMetadata::default(),
            vec![CellRecord::empty(CellKind::Markdown)],
        );
        let id = document.id();
        let backend = spawn_backend();
        backend
            .cmd_tx
            .send(CoreCmd::ResolveDocument {
                input: InputId::next(),
                source: DocumentSource::Memory(document),
            })
            .expect("send memory");
        match recv_event(&backend.evt_rx) {
            CoreEvent::DocumentResolved { document, .. } => assert_eq!(document.id(), id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn input_ids_are_monotonic() {
        let first = InputId::next();
        let second = InputId::next();
        assert!(second > first);
    }
}
