//! Protocol types for the document-resolution worker.

use notebook_core::NotebookDocument;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INPUT: AtomicU64 = AtomicU64::new(1);

/// Identity of one `set_input` request. Later requests compare greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(u64);

impl InputId {
    pub fn next() -> Self {
        Self(NEXT_INPUT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input#{}", self.0)
    }
}

/// Where a document comes from.
#[derive(Debug)]
pub enum DocumentSource {
    /// A notebook JSON file on disk.
    Path(PathBuf),
    /// Raw notebook JSON.
    Json(String),
    /// An already-built document, resolved as-is.
    Memory(NotebookDocument),
}

impl DocumentSource {
    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            DocumentSource::Path(path) => path.display().to_string(),
            DocumentSource::Json(raw) => format!("<json, {} bytes>", raw.len()),
            DocumentSource::Memory(document) => format!("<memory {}>", document.id()),
        }
    }
}

/// Commands issued by the editor for the backend worker to execute.
#[derive(Debug)]
pub enum CoreCmd {
    /// Load and parse a document for the given input.
    ResolveDocument { input: InputId, source: DocumentSource },
}

/// Events produced by the backend worker and polled by the editor each frame.
#[derive(Debug)]
pub enum CoreEvent {
    /// The document for `input` is ready.
    DocumentResolved {
        input: InputId,
        document: NotebookDocument,
    },
    /// Loading or parsing failed for `input`.
    ResolveFailed { input: InputId, message: String },
}

impl CoreEvent {
    pub fn input(&self) -> InputId {
        match self {
            CoreEvent::DocumentResolved { input, .. } | CoreEvent::ResolveFailed { input, .. } => {
                *input
            }
        }
    }
}
