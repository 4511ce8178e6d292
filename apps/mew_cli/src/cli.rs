//! mew CLI: argument parsing and the single `mew <file>` operation.
//!
//! Grounded on `apps/logicaffeine_cli/src/cli.rs` for the clap-derive
//! `Cli` struct and `run_cli` dispatch shape, trimmed to the
//! literal interface: one positional source file, no flags, exit 0 on
//! success and 1 on any error, output always written to `./out.c`.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use mew_compile::compile_to_c;

use crate::manifest::{TargetManifest, DEFAULT_TARGET};
use crate::style::Style;

/// `mew <file>` — compile a mew source file to `./out.c`.
#[derive(Parser)]
#[command(name = "mew")]
#[command(about = "The mew source-to-C transpiler", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the `.mew` source file.
    pub file: PathBuf,
}

pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let source = fs::read_to_string(&cli.file)
        .map_err(|e| format!("{}: {}", cli.file.display(), e))?;
    let filename = cli.file.to_string_lossy().into_owned();

    let manifest = TargetManifest::new(DEFAULT_TARGET)?;
    let defs = manifest.full_path("defs.h").to_string_lossy().into_owned();
    let alloc = manifest.full_path("alloc.h").to_string_lossy().into_owned();

    match compile_to_c(&source, &filename, &defs, &alloc) {
        Ok(out) => {
            for warning in &out.warnings {
                eprintln!("{}", Style::yellow(&warning.render(&source)));
            }
            fs::write("out.c", out.c_source)?;
            Ok(())
        }
        Err(diag) => {
            eprintln!("{}", Style::bold_red(&diag.render(&source)));
            Err(diag.into())
        }
    }
}
