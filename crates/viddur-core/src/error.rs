/// Error types for the scan pipeline.
///
/// `ScanError` covers conditions that stop a run. Per-file probe failures
/// are `ProbeError` values and never escape the resolver: they are turned
/// into zero-length entries plus a warning on the progress channel.
use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions for a scan or report run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root is missing or is not a directory.
    #[error("scan root {} does not exist or is not a directory", .path.display())]
    InvalidRoot { path: PathBuf },

    /// Neither `ffprobe` nor the fallback reader can be used.
    #[error("no duration probe available: {detail}")]
    ProbeUnavailable { detail: String },

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The probe worker pool could not be started.
    #[error("failed to start probe workers: {0}")]
    WorkerPool(String),

    /// A worker or the scan thread panicked.
    #[error("scan thread panicked")]
    WorkerPanicked,

    /// Rendering the report failed before anything was written.
    #[error("failed to render {format} report: {message}")]
    Render {
        format: &'static str,
        message: String,
    },

    /// The report destination could not be written. Any earlier report at
    /// the same path is left untouched.
    #[error("failed to write report to {}: {source}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single file produced no duration.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("probe exited with {status}: {stderr}")]
    ExitStatus { status: String, stderr: String },

    #[error("unparsable duration output {output:?}")]
    Parse { output: String },

    #[error("{0}")]
    Decode(String),
}

pub type ScanResult<T> = Result<T, ScanError>;
