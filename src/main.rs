//! viddur: total video playback time per folder.
//!
//! Thin binary entry point. All logic lives in the `viddur-core` and
//! `viddur-cli` crates.

use clap::Parser;
use std::process::ExitCode;
use viddur_cli::{describe, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so `--stdout` output stays clean.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("viddur {} starting", env!("CARGO_PKG_VERSION"));

    match viddur_cli::run(&cli) {
        Ok(outcome) => {
            eprintln!("{}", describe(&outcome));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
