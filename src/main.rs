//! transkey CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use transkey::cli::{run_cli, Arguments};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(2)
        }
    }
}
