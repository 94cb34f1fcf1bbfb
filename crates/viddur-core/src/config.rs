/// Scan configuration, built once at startup and passed by reference into
/// every pipeline stage.
///
/// Extension entries are normalized on the way in (trimmed, lower-cased,
/// leading dot added), so `"avi"`, `".AVI"` and `" .avi "` all match
/// `clip.avi`.
use crate::error::{ScanError, ScanResult};
use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Extensions scanned when none are given.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".mp4", ".mkv", ".avi", ".mov", ".wmv", ".flv", ".webm"];

/// Executable name looked up on `PATH` when no explicit probe path is set.
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// How durations are obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Path or bare name of the `ffprobe` executable.
    pub ffprobe: PathBuf,
    /// Use the in-process container reader when `ffprobe` cannot be run.
    pub allow_fallback: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe: PathBuf::from(DEFAULT_FFPROBE),
            allow_fallback: false,
        }
    }
}

/// Immutable description of one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    root: PathBuf,
    excluded: BTreeSet<OsString>,
    extensions: BTreeSet<String>,
    workers: usize,
    probe: ProbeConfig,
}

impl ScanConfig {
    /// Configuration for `root` with the default extensions, no exclusions
    /// and [`default_workers`] probe workers.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: BTreeSet::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            workers: default_workers(),
            probe: ProbeConfig::default(),
        }
    }

    /// Folder names to prune. Matching is exact and case-sensitive against
    /// the last path component.
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.excluded = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the extension set. Every entry is normalized; an empty set or
    /// a malformed entry is rejected.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> ScanResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .collect::<ScanResult<BTreeSet<_>>>()?;
        if normalized.is_empty() {
            return Err(ScanError::InvalidConfig(
                "at least one file extension is required".into(),
            ));
        }
        self.extensions = normalized;
        Ok(self)
    }

    pub fn with_workers(mut self, workers: usize) -> ScanResult<Self> {
        if workers == 0 {
            return Err(ScanError::InvalidConfig(
                "worker count must be at least 1".into(),
            ));
        }
        self.workers = workers;
        Ok(self)
    }

    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn excluded(&self) -> &BTreeSet<OsString> {
        &self.excluded
    }

    /// Normalized extensions, each with a leading dot.
    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn probe(&self) -> &ProbeConfig {
        &self.probe
    }

    /// `true` if a directory with this base name must not be entered.
    pub fn is_excluded(&self, name: &OsStr) -> bool {
        self.excluded.contains(name)
    }

    /// `true` if the file's lower-cased extension is in the configured set.
    pub fn matches_extension(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let dotted = format!(".{}", ext.to_string_lossy().to_lowercase());
                self.extensions.contains(&dotted)
            }
            None => false,
        }
    }
}

/// Twice the number of logical CPUs. Probing is dominated by process start
/// and I/O wait, so oversubscribing the cores keeps them busy.
pub fn default_workers() -> usize {
    (num_cpus::get() * 2).max(1)
}

/// Normalize one user-supplied extension to `.ext` form.
pub fn normalize_extension(raw: &str) -> ScanResult<String> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if bare.is_empty() {
        return Err(ScanError::InvalidConfig(format!(
            "empty file extension {raw:?}"
        )));
    }
    if bare
        .chars()
        .any(|c| c == '.' || c == '/' || c == '\\' || c.is_whitespace())
    {
        return Err(ScanError::InvalidConfig(format!(
            "file extension {raw:?} must be a single suffix such as \".mp4\""
        )));
    }
    Ok(format!(".{}", bare.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_missing_dot_and_lowercases() {
        assert_eq!(normalize_extension("avi").unwrap(), ".avi");
        assert_eq!(normalize_extension(".MKV").unwrap(), ".mkv");
        assert_eq!(normalize_extension("  .Webm ").unwrap(), ".webm");
    }

    #[test]
    fn normalize_rejects_malformed_entries() {
        assert!(normalize_extension("").is_err());
        assert!(normalize_extension(".").is_err());
        assert!(normalize_extension("tar.gz").is_err());
        assert!(normalize_extension("m p4").is_err());
    }

    #[test]
    fn default_set_matches_avi() {
        let config = ScanConfig::new("/videos");
        assert!(config.matches_extension(Path::new("/videos/clip.avi")));
        assert!(config.matches_extension(Path::new("/videos/CLIP.MP4")));
        assert!(!config.matches_extension(Path::new("/videos/notes.txt")));
        assert!(!config.matches_extension(Path::new("/videos/mp4")));
    }

    #[test]
    fn every_default_extension_is_already_normalized() {
        for ext in DEFAULT_EXTENSIONS {
            assert_eq!(normalize_extension(ext).unwrap(), *ext);
        }
    }

    #[test]
    fn custom_extensions_replace_defaults() {
        let config = ScanConfig::new("/v").with_extensions(["ts", ".M2TS"]).unwrap();
        assert!(config.matches_extension(Path::new("a.ts")));
        assert!(config.matches_extension(Path::new("a.m2ts")));
        assert!(!config.matches_extension(Path::new("a.mp4")));
    }

    #[test]
    fn empty_extension_set_is_rejected() {
        let none: [&str; 0] = [];
        assert!(matches!(
            ScanConfig::new("/v").with_extensions(none),
            Err(ScanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(ScanConfig::new("/v").with_workers(0).is_err());
        assert_eq!(ScanConfig::new("/v").with_workers(3).unwrap().workers(), 3);
    }

    #[test]
    fn exclusion_is_case_sensitive() {
        let config = ScanConfig::new("/v").with_excluded(["Backups"]);
        assert!(config.is_excluded(OsStr::new("Backups")));
        assert!(!config.is_excluded(OsStr::new("backups")));
    }
}
