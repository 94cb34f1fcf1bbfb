/// viddur core: video discovery, duration probing, aggregation and reports.
///
/// This crate holds all of the scanning and reporting logic and has no
/// terminal dependencies, so any frontend can drive it.
///
/// # Modules
///
/// - [`config`]: immutable scan configuration.
/// - [`model`]: probed files and per-folder aggregates.
/// - [`scanner`]: discovery, bounded-parallel probing and aggregation, with
///   progress reporting.
/// - [`analysis`]: folder sorting.
/// - [`report`]: text, CSV and JSON rendering and the atomic report writer.
pub mod analysis;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod scanner;

pub use config::{ProbeConfig, ScanConfig};
pub use error::{ProbeError, ScanError, ScanResult};
pub use scanner::probe::DurationProbe;
pub use scanner::progress::{ScanProgress, WarningKind};
pub use scanner::{scan, start_scan, start_scan_with, ScanHandle, ScanOutcome};
