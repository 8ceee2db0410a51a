//! Workspace launcher for the headless notebook viewer.

fn main() {
    if let Err(err) = notebook_view::run() {
        eprintln!("notebook: {}", err);
        std::process::exit(i32::from(notebook_view::cli::exit_code(&err)));
    }
}
