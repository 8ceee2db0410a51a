//! `notebook-view`: print the settled layout window of a notebook file.

fn main() {
    if let Err(err) = notebook_view::run() {
        eprintln!("notebook-view: {}", err);
        std::process::exit(i32::from(notebook_view::cli::exit_code(&err)));
    }
}
