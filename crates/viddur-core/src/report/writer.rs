/// Report destination and atomic write.
///
/// The bytes go to a temporary file in the destination directory, are
/// flushed to disk, and the temporary file is then renamed over the
/// destination. A failure at any step leaves an earlier report untouched.
use super::ReportFormat;
use crate::error::{ScanError, ScanResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// `{root base name} - Video Duration.{ext}` inside `root`.
///
/// A root without a base name (`/`) is called `root`.
pub fn report_path(root: &Path, format: ReportFormat) -> PathBuf {
    let base = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());
    root.join(format!("{base} - Video Duration.{}", format.extension()))
}

/// Write `bytes` to `path` atomically.
pub fn write_report(path: &Path, bytes: &[u8]) -> ScanResult<()> {
    let failed = |source: std::io::Error| ScanError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(failed)?;
    tmp.write_all(bytes).map_err(failed)?;
    tmp.as_file().sync_all().map_err(failed)?;
    tmp.persist(path).map_err(|e| failed(e.error))?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn path_uses_root_base_name() {
        let path = report_path(Path::new("/media/Movies"), ReportFormat::Csv);
        assert_eq!(path, Path::new("/media/Movies/Movies - Video Duration.csv"));

        let path = report_path(Path::new("/"), ReportFormat::Text);
        assert_eq!(path, Path::new("/root - Video Duration.txt"));
    }

    #[test]
    fn writes_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");

        write_report(&path, b"first").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"first");

        write_report(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");

        // No temporary files left behind.
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write_keeps_prior_report() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        fs::write(&path, b"old").unwrap();

        // A directory in the way makes the rename fail after the temp file
        // was written.
        let blocked = tmp.path().join("blocked");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), b"x").unwrap();
        let err = write_report(&blocked, b"new").unwrap_err();
        assert!(matches!(err, ScanError::ReportWrite { .. }));
        assert!(blocked.is_dir());

        let missing = tmp.path().join("nope").join("out.json");
        assert!(write_report(&missing, b"new").is_err());
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }
}
