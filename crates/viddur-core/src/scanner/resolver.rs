/// Bounded-parallel duration resolution.
///
/// Every path becomes one task on a dedicated rayon pool of `W` threads.
/// Workers never touch shared state: each sends its [`ProbeOutcome`] down a
/// crossbeam channel, and the channel is drained on the *calling* thread,
/// which hands every outcome to the caller's closure. That closure is
/// therefore the single writer for anything it captures, and no locks are
/// needed downstream.
use crate::error::{ProbeError, ScanError, ScanResult};
use crate::scanner::probe::DurationProbe;
use std::path::PathBuf;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// What one worker produced for one path.
#[derive(Debug)]
pub struct ProbeOutcome {
    pub path: PathBuf,
    pub duration: Result<f64, ProbeError>,
    /// File mtime, or the Unix epoch if it could not be read.
    pub modified_at: SystemTime,
}

/// Probe every path on up to `workers` threads.
///
/// `on_result` runs on the calling thread once per path, in completion
/// order, together with the number of probes finished so far (1-based).
/// The pool never has more threads than there are paths.
pub fn resolve_all<F>(
    paths: Vec<PathBuf>,
    workers: usize,
    probe: &dyn DurationProbe,
    mut on_result: F,
) -> ScanResult<()>
where
    F: FnMut(ProbeOutcome, usize),
{
    if paths.is_empty() {
        return Ok(());
    }

    let threads = workers.clamp(1, paths.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("viddur-probe-{i}"))
        .build()
        .map_err(|e| ScanError::WorkerPool(e.to_string()))?;
    debug!("Dispatching {} probes to {threads} workers", paths.len());

    let (result_tx, result_rx) = crossbeam_channel::unbounded::<ProbeOutcome>();

    thread::scope(|scope| {
        // The dispatcher owns the original sender. It is dropped once every
        // task has finished, which closes the channel and ends the loop below.
        let dispatcher = thread::Builder::new()
            .name("viddur-dispatch".into())
            .spawn_scoped(scope, move || {
                pool.scope(|s| {
                    for path in paths {
                        let tx = result_tx.clone();
                        s.spawn(move |_| {
                            let _ = tx.send(probe_one(probe, path));
                        });
                    }
                });
            })
            .map_err(|e| ScanError::WorkerPool(e.to_string()))?;

        let mut completed = 0usize;
        for outcome in result_rx.iter() {
            completed += 1;
            on_result(outcome, completed);
        }

        dispatcher.join().map_err(|_| ScanError::WorkerPanicked)
    })
}

fn probe_one(probe: &dyn DurationProbe, path: PathBuf) -> ProbeOutcome {
    let duration = probe.probe(&path);
    let modified_at = std::fs::metadata(&path)
        .and_then(|m| m.modified())
        .unwrap_or(UNIX_EPOCH);
    match &duration {
        Ok(secs) => debug!("{}: {secs:.2}s", path.display()),
        Err(err) => debug!("{}: probe failed: {err}", path.display()),
    }
    ProbeOutcome {
        path,
        duration,
        modified_at,
    }
}
