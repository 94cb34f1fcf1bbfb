/// Scan progress reporting: lightweight messages sent from the scan thread
/// to the frontend over a crossbeam channel.
///
/// Warnings travel on the same channel as progress so the frontend can
/// print them inline, in the order they happened.
use std::path::PathBuf;
use std::time::Duration;

/// Recoverable conditions surfaced during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A directory could not be listed; its subtree was skipped.
    SubtreeUnreadable,
    /// A file could not be probed; it was counted with zero duration.
    FileProbeFailure,
}

impl WarningKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::SubtreeUnreadable => "unreadable folder",
            Self::FileProbeFailure => "probe failed",
        }
    }
}

#[derive(Debug)]
pub enum ScanProgress {
    /// The duration probe that will be used for this run.
    ProbeSelected { name: &'static str },
    /// Discovery finished; `files_found` probes are about to be dispatched.
    Discovered { files_found: usize },
    /// One probe finished. `completed` counts finished probes, whatever
    /// order they finish in.
    Probed {
        completed: usize,
        total: usize,
        path: PathBuf,
    },
    /// A non-fatal problem.
    Warning {
        kind: WarningKind,
        path: PathBuf,
        message: String,
    },
    /// The scan finished and the aggregates are final.
    Complete {
        duration: Duration,
        folder_count: usize,
        video_count: usize,
        warning_count: usize,
    },
}
