/// A single probed media file.
///
/// Built once by the pipeline when a probe completes and never changed
/// afterwards. Once absorbed into a [`FolderAggregate`](super::FolderAggregate)
/// it is only reachable through shared references.
use compact_str::CompactString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoFile {
    /// Absolute path. Unique across a scan.
    pub path: PathBuf,

    /// File name component only.
    pub name: CompactString,

    /// Directory that directly contains the file.
    pub folder: PathBuf,

    /// Playback length in seconds. Always finite and `>= 0`; `0` when the
    /// probe failed.
    pub duration_seconds: f64,

    /// Last-modified time of the file.
    pub modified_at: SystemTime,

    /// `true` if the probe failed and `duration_seconds` is the `0` stand-in.
    pub probe_failed: bool,
}

impl VideoFile {
    /// A successfully probed file. Negative or non-finite durations are
    /// clamped to `0`.
    pub fn new(path: PathBuf, duration_seconds: f64, modified_at: SystemTime) -> Self {
        let duration_seconds = if duration_seconds.is_finite() && duration_seconds > 0.0 {
            duration_seconds
        } else {
            0.0
        };
        Self::build(path, duration_seconds, modified_at, false)
    }

    /// A file whose probe failed. Still counted, with zero duration.
    pub fn failed(path: PathBuf, modified_at: SystemTime) -> Self {
        Self::build(path, 0.0, modified_at, true)
    }

    fn build(path: PathBuf, duration_seconds: f64, modified_at: SystemTime, probe_failed: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_default();
        let folder = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            path,
            name,
            folder,
            duration_seconds,
            modified_at,
            probe_failed,
        }
    }
}
