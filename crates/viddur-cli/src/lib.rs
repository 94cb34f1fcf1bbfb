/// viddur CLI: argument parsing, progress display and the run loop.
///
/// Scanning and rendering live in `viddur-core`; this crate only wires them
/// to the terminal.
pub mod args;
pub mod progress;
pub mod run;

pub use args::Cli;
pub use run::{describe, run, run_with_probe, RunOutcome};
