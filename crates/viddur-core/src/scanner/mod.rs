/// Scanner module: orchestrates discovery, probing and aggregation.
///
/// The pipeline runs strictly forward:
/// - **Discovery** walks the tree with `jwalk`, pruning excluded folders.
/// - **Resolution** probes every file on a bounded worker pool.
/// - **Aggregation** folds the results into per-folder totals on the scan
///   thread alone, as they arrive.
///
/// [`start_scan`] runs all of this on a background thread and streams
/// [`ScanProgress`] messages back over a bounded channel.
pub mod aggregator;
pub mod discovery;
pub mod probe;
pub mod progress;
pub mod resolver;

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::model::{from_micros, FolderAggregate, VideoFile};
use aggregator::Aggregator;
use crossbeam_channel::{Receiver, Sender};
use probe::DurationProbe;
use progress::{ScanProgress, WarningKind};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Maximum number of progress messages that may queue up in the channel.
///
/// One message is sent per probed file plus one per warning. If the
/// frontend stops draining, the scan thread blocks on `send` rather than
/// growing the queue without bound; probe workers keep running meanwhile.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// Final, read-only result of a scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Absolute scan root.
    pub root: PathBuf,
    /// One aggregate per folder with at least one matching file, in folder
    /// path order.
    pub folders: Vec<FolderAggregate>,
    /// Files whose probe failed (counted with zero duration).
    pub failed_probes: usize,
    /// All warnings raised, unreadable folders included.
    pub warning_count: usize,
    pub elapsed: Duration,
}

impl ScanOutcome {
    /// `true` if no file matched the configured extensions.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn video_count(&self) -> usize {
        self.folders.iter().map(FolderAggregate::video_count).sum()
    }

    pub fn total_seconds(&self) -> f64 {
        from_micros(self.folders.iter().map(FolderAggregate::total_micros).sum())
    }
}

/// Handle to a running scan.
pub struct ScanHandle {
    /// Progress and warnings from the scan thread. Disconnects when the
    /// scan ends, successfully or not.
    pub progress_rx: Receiver<ScanProgress>,
    thread: thread::JoinHandle<ScanResult<ScanOutcome>>,
}

impl ScanHandle {
    /// Wait for the scan thread and return its outcome.
    pub fn join(self) -> ScanResult<ScanOutcome> {
        self.thread.join().map_err(|_| ScanError::WorkerPanicked)?
    }
}

/// Start a scan on a background thread, choosing the probe from the
/// configuration (see [`probe::select_probe`]).
pub fn start_scan(config: ScanConfig) -> ScanResult<ScanHandle> {
    spawn_scan(move |tx| run(&config, &tx))
}

/// Start a scan on a background thread with an explicit probe.
pub fn start_scan_with(config: ScanConfig, probe: Box<dyn DurationProbe>) -> ScanResult<ScanHandle> {
    spawn_scan(move |tx| scan(&config, probe.as_ref(), &tx))
}

fn spawn_scan<F>(body: F) -> ScanResult<ScanHandle>
where
    F: FnOnce(Sender<ScanProgress>) -> ScanResult<ScanOutcome> + Send + 'static,
{
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);

    let thread = thread::Builder::new()
        .name("viddur-scanner".into())
        .spawn(move || body(progress_tx))
        .map_err(|e| ScanError::WorkerPool(e.to_string()))?;

    Ok(ScanHandle {
        progress_rx,
        thread,
    })
}

/// Validate the root, select a probe, and scan. Runs on the calling thread.
pub fn run(config: &ScanConfig, progress_tx: &Sender<ScanProgress>) -> ScanResult<ScanOutcome> {
    discovery::validate_root(config.root())?;
    let probe = probe::select_probe(config.probe())?;
    scan(config, probe.as_ref(), progress_tx)
}

/// Run the full pipeline with the given probe on the calling thread.
///
/// Fails before any work is scheduled if the root is not a directory
/// ([`ScanError::InvalidRoot`]) or the probe cannot run
/// ([`ScanError::ProbeUnavailable`]). Everything after that is recovered
/// and reported as a warning.
pub fn scan(
    config: &ScanConfig,
    probe: &dyn DurationProbe,
    progress_tx: &Sender<ScanProgress>,
) -> ScanResult<ScanOutcome> {
    let start = Instant::now();
    let root = discovery::validate_root(config.root())?;
    probe
        .check_available()
        .map_err(|detail| ScanError::ProbeUnavailable { detail })?;
    let _ = progress_tx.send(ScanProgress::ProbeSelected { name: probe.name() });

    info!("Starting scan of {} using {}", root.display(), probe.name());

    let discovered = discovery::discover(&root, config, progress_tx);
    let total = discovered.files.len();
    info!("Found {total} matching files in {:?}", start.elapsed());
    let _ = progress_tx.send(ScanProgress::Discovered { files_found: total });

    let mut aggregator = Aggregator::new();
    let mut failed_probes = 0usize;

    resolver::resolve_all(
        discovered.files,
        config.workers(),
        probe,
        |outcome, completed| {
            let file = match outcome.duration {
                Ok(secs) => VideoFile::new(outcome.path, secs, outcome.modified_at),
                Err(err) => {
                    failed_probes += 1;
                    let message = err.to_string();
                    warn!("Could not probe {}: {message}", outcome.path.display());
                    let _ = progress_tx.send(ScanProgress::Warning {
                        kind: WarningKind::FileProbeFailure,
                        path: outcome.path.clone(),
                        message,
                    });
                    VideoFile::failed(outcome.path, outcome.modified_at)
                }
            };
            let _ = progress_tx.send(ScanProgress::Probed {
                completed,
                total,
                path: file.path.clone(),
            });
            aggregator.absorb(file);
        },
    )?;

    let folders = aggregator.finish();
    let outcome = ScanOutcome {
        root,
        folders,
        failed_probes,
        warning_count: discovered.unreadable + failed_probes,
        elapsed: start.elapsed(),
    };

    info!(
        "Scan complete: {} videos in {} folders in {:?}",
        outcome.video_count(),
        outcome.folders.len(),
        outcome.elapsed
    );
    let _ = progress_tx.send(ScanProgress::Complete {
        duration: outcome.elapsed,
        folder_count: outcome.folders.len(),
        video_count: outcome.video_count(),
        warning_count: outcome.warning_count,
    });

    Ok(outcome)
}
