//! CLI layer - user-facing command-line interface.
//!
//! A single operation: glob a source tree, run the extraction engine, and
//! print discovered keys and warnings as JSON.
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions using clap
//! - `run`: file discovery + extraction + JSON output + exit status

use std::process::ExitCode;

use anyhow::Result;

pub use args::Arguments;
pub use run::ExitStatus;

pub mod args;
mod run;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let status = run::run(args)?;
    Ok(status.into())
}
