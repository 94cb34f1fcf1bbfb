/// End-to-end scanner integration tests.
///
/// These tests drive the real pipeline (jwalk discovery, the rayon probe
/// pool, the aggregator and the renderers) over a real temporary tree. Only
/// the duration probe is replaced: `StubProbe` answers from the file name,
/// so results are deterministic and no `ffprobe` install is needed.
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use viddur_core::report::{renderer_for, report_path, write_report, Report, ReportFormat, ReportOptions};
use viddur_core::scanner::progress::ScanProgress;
use viddur_core::scanner::{start_scan_with, ScanHandle, ScanOutcome, PROGRESS_CHANNEL_CAPACITY};
use viddur_core::{DurationProbe, ProbeError, ScanConfig, ScanError, WarningKind};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Durations by file name. Names listed in `failing` error out; anything
/// else unknown is one second long.
struct StubProbe {
    failing: &'static [&'static str],
    unavailable: bool,
}

impl StubProbe {
    fn new() -> Self {
        Self {
            failing: &["2.mp4"],
            unavailable: false,
        }
    }
}

impl DurationProbe for StubProbe {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn check_available(&self) -> Result<(), String> {
        if self.unavailable {
            Err("stub probe switched off".into())
        } else {
            Ok(())
        }
    }

    fn probe(&self, path: &Path) -> Result<f64, ProbeError> {
        let name = path.file_name().unwrap().to_string_lossy();
        if self.failing.contains(&name.as_ref()) {
            return Err(ProbeError::Parse {
                output: "N/A".into(),
            });
        }
        Ok(match name.as_ref() {
            "1.mp4" => 60.0,
            "3.mkv" => 120.0,
            _ => 1.0,
        })
    }
}

/// Create the reference tree:
///
/// ```text
/// root/
///   A/
///     1.mp4      (60 s)
///     2.mp4      (probe fails)
///     notes.txt  (ignored)
///   B/
///     3.mkv      (120 s)
/// ```
fn build_test_tree(root: &Path) {
    touch(&root.join("A/1.mp4"));
    touch(&root.join("A/2.mp4"));
    touch(&root.join("A/notes.txt"));
    touch(&root.join("B/3.mkv"));
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"not really a video").unwrap();
}

/// Drain all progress messages from a scan, then join it.
///
/// Waits up to 30 seconds, which is plenty for a tmpdir scan but keeps a
/// genuinely stuck test from blocking the suite.
fn drain_to_completion(handle: ScanHandle) -> (Vec<ScanProgress>, Result<ScanOutcome, ScanError>) {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut messages = Vec::new();
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not finish within 30 seconds"
        );
        match handle.progress_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(msg) => messages.push(msg),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }
    (messages, handle.join())
}

fn run_stub(config: ScanConfig, probe: StubProbe) -> (Vec<ScanProgress>, Result<ScanOutcome, ScanError>) {
    let handle = start_scan_with(config, Box::new(probe)).expect("failed to start scan");
    drain_to_completion(handle)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// A/1.mp4 + failed A/2.mp4 + B/3.mkv aggregate to 3 videos and 180 s.
#[test]
fn scan_aggregates_reference_tree() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let config = ScanConfig::new(tmp.path()).with_workers(4).unwrap();
    let (_, result) = run_stub(config, StubProbe::new());
    let outcome = result.expect("scan failed");

    assert_eq!(outcome.folders.len(), 2);
    let a = &outcome.folders[0];
    let b = &outcome.folders[1];
    assert_eq!(a.folder_path(), tmp.path().join("A"));
    assert_eq!(a.video_count(), 2);
    assert_eq!(a.failed_count(), 1);
    assert_eq!(a.total_seconds(), 60.0);
    assert_eq!(b.folder_path(), tmp.path().join("B"));
    assert_eq!(b.video_count(), 1);
    assert_eq!(b.total_seconds(), 120.0);

    assert_eq!(outcome.video_count(), 3);
    assert_eq!(outcome.total_seconds(), 180.0);
    assert_eq!(outcome.failed_probes, 1);
    assert_eq!(outcome.warning_count, 1);
    assert_eq!(viddur_core::model::format_hms(outcome.total_seconds()), "0:03:00");
}

/// Every probe is reported exactly once and the final message is `Complete`.
#[test]
fn scan_reports_progress_and_warnings() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let (messages, result) = run_stub(ScanConfig::new(tmp.path()), StubProbe::new());
    result.expect("scan failed");

    assert!(matches!(
        messages.first(),
        Some(ScanProgress::ProbeSelected { name: "stub" })
    ));
    assert!(messages
        .iter()
        .any(|m| matches!(m, ScanProgress::Discovered { files_found: 3 })));

    let mut completed: Vec<usize> = messages
        .iter()
        .filter_map(|m| match m {
            ScanProgress::Probed { completed, total, .. } => {
                assert_eq!(*total, 3);
                Some(*completed)
            }
            _ => None,
        })
        .collect();
    completed.sort_unstable();
    assert_eq!(completed, [1, 2, 3]);

    let warnings: Vec<&ScanProgress> = messages
        .iter()
        .filter(|m| matches!(m, ScanProgress::Warning { .. }))
        .collect();
    assert_eq!(warnings.len(), 1);
    match warnings[0] {
        ScanProgress::Warning { kind, path, .. } => {
            assert_eq!(*kind, WarningKind::FileProbeFailure);
            assert!(path.ends_with("A/2.mp4"));
        }
        _ => unreachable!(),
    }

    match messages.last() {
        Some(ScanProgress::Complete {
            folder_count,
            video_count,
            warning_count,
            ..
        }) => {
            assert_eq!(*folder_count, 2);
            assert_eq!(*video_count, 3);
            assert_eq!(*warning_count, 1);
        }
        other => panic!("expected Complete last, got {other:?}"),
    }
}

/// Excluded folders contribute nothing, however deep they sit.
#[test]
fn scan_prunes_excluded_folders() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    touch(&tmp.path().join("Trash/x.mp4"));
    touch(&tmp.path().join("B/deeper/Trash/y.mp4"));
    touch(&tmp.path().join("B/deeper/z.webm"));

    let config = ScanConfig::new(tmp.path()).with_excluded(["Trash"]);
    let (_, result) = run_stub(config, StubProbe::new());
    let outcome = result.expect("scan failed");

    let folders: Vec<_> = outcome
        .folders
        .iter()
        .map(|f| f.folder_path().strip_prefix(tmp.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        folders,
        [Path::new("A"), Path::new("B"), Path::new("B/deeper")]
    );
    assert!(outcome
        .folders
        .iter()
        .flat_map(|f| f.files())
        .all(|file| !file.path.components().any(|c| c.as_os_str() == "Trash")));
}

/// A folder that cannot be listed is skipped with a warning; the rest of the
/// tree is still scanned.
#[cfg(unix)]
#[test]
fn scan_warns_about_unreadable_folders() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    let locked = tmp.path().join("locked");
    touch(&locked.join("4.mp4"));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root ignores directory permissions.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let (messages, result) = run_stub(ScanConfig::new(tmp.path()), StubProbe::new());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let outcome = result.expect("scan failed");

    let unreadable: Vec<&Path> = messages
        .iter()
        .filter_map(|m| match m {
            ScanProgress::Warning {
                kind: WarningKind::SubtreeUnreadable,
                path,
                ..
            } => Some(path.as_path()),
            _ => None,
        })
        .collect();
    assert_eq!(unreadable, [locked.as_path()]);

    // One unreadable folder plus the failing 2.mp4.
    assert_eq!(outcome.warning_count, 2);
    assert_eq!(outcome.video_count(), 3);
    match messages.last() {
        Some(ScanProgress::Complete { warning_count, .. }) => assert_eq!(*warning_count, 2),
        other => panic!("expected Complete last, got {other:?}"),
    }
}

/// A tree without matching files yields an empty outcome and no report.
#[test]
fn scan_empty_directory() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    touch(&tmp.path().join("docs/readme.txt"));

    let (messages, result) = run_stub(ScanConfig::new(tmp.path()), StubProbe::new());
    let outcome = result.expect("scan failed");

    assert!(outcome.is_empty());
    assert_eq!(outcome.video_count(), 0);
    assert!(!messages
        .iter()
        .any(|m| matches!(m, ScanProgress::Probed { .. })));
    assert!(!report_path(tmp.path(), ReportFormat::Text).exists());
}

/// A missing root fails before the probe is consulted.
#[test]
fn scan_rejects_missing_root() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let missing = tmp.path().join("gone");

    let probe = StubProbe {
        unavailable: true,
        ..StubProbe::new()
    };
    let (messages, result) = run_stub(ScanConfig::new(&missing), probe);
    assert!(matches!(result, Err(ScanError::InvalidRoot { .. })));
    assert!(messages.is_empty());
}

/// An unusable probe stops the run before any work is scheduled.
#[test]
fn scan_fails_fast_without_probe() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let probe = StubProbe {
        unavailable: true,
        ..StubProbe::new()
    };
    let (messages, result) = run_stub(ScanConfig::new(tmp.path()), probe);
    assert!(matches!(result, Err(ScanError::ProbeUnavailable { .. })));
    assert!(messages.is_empty());
}

/// Scan, render JSON, write it next to the videos and read it back.
#[test]
fn scan_writes_json_report() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let (_, result) = run_stub(ScanConfig::new(tmp.path()), StubProbe::new());
    let outcome = result.expect("scan failed");

    let options = ReportOptions {
        format: ReportFormat::Json,
        ..Default::default()
    };
    let report = Report::sorted(&outcome.root, &outcome.folders, &options);
    let bytes = renderer_for(&options).render(&report).unwrap();
    let path = report_path(&outcome.root, options.format);
    write_report(&path, &bytes).unwrap();

    let base = tmp.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        format!("{base} - Video Duration.json")
    );

    let doc: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let details = doc["details"].as_array().unwrap();
    let videos: u64 = details.iter().map(|d| d["video_count"].as_u64().unwrap()).sum();
    let seconds: f64 = details.iter().map(|d| d["total_seconds"].as_f64().unwrap()).sum();
    assert_eq!(doc["summary"]["total_videos"].as_u64().unwrap(), videos);
    assert_eq!(doc["summary"]["total_duration_seconds"].as_f64().unwrap(), seconds);
    assert_eq!(doc["summary"]["total_duration_formatted"], "0:03:00");
}

/// A second scan of the same tree produces the same report bytes.
#[test]
fn scan_text_report_is_reproducible() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_test_tree(tmp.path());
    for i in 0..20 {
        touch(&tmp.path().join(format!("C/{i:02}.mov")));
    }

    let options = ReportOptions::default();
    let render = || {
        let (_, result) = run_stub(ScanConfig::new(tmp.path()), StubProbe::new());
        let outcome = result.expect("scan failed");
        let report = Report::sorted(&outcome.root, &outcome.folders, &options);
        renderer_for(&options).render(&report).unwrap()
    };

    let first = render();
    assert_eq!(first, render());
    let text = String::from_utf8(first).unwrap();
    assert!(text.contains("  -> Videos:  20 | Duration: 0:00:20"));
    assert!(text.contains("  -> Total Videos: 23"));
}

const _: () = assert!(
    PROGRESS_CHANNEL_CAPACITY > 0,
    "PROGRESS_CHANNEL_CAPACITY must be > 0"
);
