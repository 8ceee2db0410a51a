//! Background worker thread for document resolution.

use crate::backend::{CoreCmd, CoreEvent, DocumentSource};
use crossbeam_channel::{unbounded, Receiver, Sender};
use notebook_core::{NotebookDocument, NotebookError};
use std::thread;
use std::time::Instant;
use tracing::{debug, warn};

/// Handle for sending commands to, and receiving events from, the backend worker.
pub struct BackendHandle {
    pub cmd_tx: Sender<CoreCmd>,
    pub evt_rx: Receiver<CoreEvent>,
}

impl BackendHandle {
    /// Wrap test-owned channels so tests can observe commands and inject events.
    #[cfg(test)]
    pub(crate) fn from_test_channels(cmd_tx: Sender<CoreCmd>, evt_rx: Receiver<CoreEvent>) -> Self {
        Self { cmd_tx, evt_rx }
    }
}

fn resolve(source: DocumentSource) -> Result<NotebookDocument, NotebookError> {
    match source {
        DocumentSource::Path(path) => NotebookDocument::from_path(&path),
        DocumentSource::Json(raw) => NotebookDocument::from_json(&raw),
        DocumentSource::Memory(document) => Ok(document),
    }
}

/// Spawn the backend worker thread that loads and parses documents.
///
/// File I/O and JSON parsing stay off the editor thread; the worker replies
/// with [`CoreEvent`] values that are polled each frame. The worker exits when
/// every command sender is dropped.
///
/// # Returns
/// A [`BackendHandle`] containing the command sender and event receiver.
///
/// # Panics
/// Panics if the worker thread cannot be spawned.
pub fn spawn_backend() -> BackendHandle {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();

    thread::Builder::new()
        .name("notebook-view-backend".to_string())
        .spawn(move || {
            for cmd in cmd_rx.iter() {
                match cmd {
                    CoreCmd::ResolveDocument { input, source } => {
                        let started = Instant::now();
                        let label = source.describe();
                        let event = match resolve(source) {
                            Ok(document) => {
                                debug!(
                                    %input,
                                    source = %label,
                                    cells = document.len(),
                                    elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                                    "document resolved"
                                );
                                CoreEvent::DocumentResolved { input, document }
                            }
                            Err(err) => {
                                warn!(
                                    %input,
                                    source = %label,
                                    "document resolution failed: {}",
                                    err
                                );
                                CoreEvent::ResolveFailed {
                                    input,
                                    message: err.to_string(),
                                }
                            }
                        };
                        if evt_tx.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
        })
        .expect("failed to spawn backend worker");

    BackendHandle { cmd_tx, evt_rx }
}
