//! Notebook view library entry point.
//!
//! Exposes the editor view core plus a `run` helper so the workspace root can
//! launch the headless viewer without duplicating initialization logic.

/// Cell view state, render delegates, virtual list, and the editor.
pub mod app;
/// Backend worker + protocol types used by the editor and headless tests.
pub mod backend;
/// Command-line front end.
pub mod cli;
/// Host collaborators: markdown, size observation, outputs, measurement.
pub mod host;

pub use app::NotebookEditor;
pub use cli::ViewArgs;

use clap::Parser;
use notebook_core::{Config, NotebookError};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Later calls are no-ops.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("notebook_view=info,notebook_core=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init();
}

/// Parse process arguments, run the headless viewer, and print its report.
///
/// # Errors
/// Propagates notebook loading and reporting errors.
pub fn run() -> Result<(), NotebookError> {
    init_tracing();
    let args = ViewArgs::parse();
    let output = cli::render_window(&args, Config::from_env())?;
    println!("{}", output);
    Ok(())
}
