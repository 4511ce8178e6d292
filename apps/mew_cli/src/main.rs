//! mew CLI binary entry point.
//!
//! A thin wrapper around [`mew_cli::run_cli`], handling error display and
//! exit codes. All command logic lives in the library crate for testability.

fn main() {
    if let Err(e) = mew_cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
