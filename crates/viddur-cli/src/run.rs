/// One `viddur` invocation: configure, scan, render, write.
use crate::args::Cli;
use crate::progress;
use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tracing::info;
use viddur_core::config::{ProbeConfig, ScanConfig};
use viddur_core::report::{renderer_for, report_path, write_report, Report};
use viddur_core::scanner::{self, ScanHandle, ScanOutcome};
use viddur_core::DurationProbe;

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The report was written to this path.
    Written { path: PathBuf, failed_probes: usize },
    /// The report went to stdout.
    Printed { failed_probes: usize },
    /// No file matched; nothing was written.
    NoMatches { extensions: Vec<String> },
}

/// Run with the probe chosen from the command line.
pub fn run(cli: &Cli) -> Result<RunOutcome> {
    let config = build_config(cli)?;
    let extensions = config.extensions().iter().cloned().collect();
    let handle = scanner::start_scan(config).context("failed to start scan")?;
    finish(cli, handle, extensions)
}

/// Run with an explicit probe instead of `ffprobe`.
pub fn run_with_probe(cli: &Cli, probe: Box<dyn DurationProbe>) -> Result<RunOutcome> {
    let config = build_config(cli)?;
    let extensions = config.extensions().iter().cloned().collect();
    let handle = scanner::start_scan_with(config, probe).context("failed to start scan")?;
    finish(cli, handle, extensions)
}

/// Translate arguments into a validated [`ScanConfig`].
pub fn build_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = ScanConfig::new(&cli.root)
        .with_excluded(cli.exclude.iter().cloned())
        .with_extensions(cli.extensions())
        .context("invalid --ext value")?
        .with_probe(ProbeConfig {
            ffprobe: cli.ffprobe.clone(),
            allow_fallback: cli.allow_fallback,
        });
    if let Some(workers) = cli.workers {
        config = config
            .with_workers(usize::from(workers))
            .context("invalid --workers value")?;
    }
    Ok(config)
}

fn finish(cli: &Cli, handle: ScanHandle, extensions: Vec<String>) -> Result<RunOutcome> {
    let show_bar = !cli.quiet && std::io::stderr().is_terminal();
    let seen = progress::drain(&handle.progress_rx, show_bar);
    let outcome = handle.join().context("scan failed")?;

    if let Some(probe) = seen.probe {
        info!("Durations read with {probe}");
    }

    if outcome.is_empty() {
        return Ok(RunOutcome::NoMatches { extensions });
    }

    emit(cli, &outcome)
}

fn emit(cli: &Cli, outcome: &ScanOutcome) -> Result<RunOutcome> {
    let options = cli.report_options();
    let report = Report::sorted(&outcome.root, &outcome.folders, &options);
    let renderer = renderer_for(&options);
    let bytes = renderer
        .render(&report)
        .context("failed to render report")?;

    if cli.stdout {
        let mut out = std::io::stdout().lock();
        out.write_all(&bytes)
            .and_then(|()| out.flush())
            .context("failed to write report to stdout")?;
        return Ok(RunOutcome::Printed {
            failed_probes: outcome.failed_probes,
        });
    }

    let path = report_path(&outcome.root, renderer.format());
    write_report(&path, &bytes)?;
    info!("Report written to {}", path.display());
    Ok(RunOutcome::Written {
        path,
        failed_probes: outcome.failed_probes,
    })
}

/// User-facing line for a finished run.
pub fn describe(outcome: &RunOutcome) -> String {
    let failures = |n: usize| match n {
        0 => String::new(),
        1 => " (1 file could not be probed and counts as 0:00:00)".to_string(),
        n => format!(" ({n} files could not be probed and count as 0:00:00)"),
    };
    match outcome {
        RunOutcome::Written {
            path,
            failed_probes,
        } => format!("Report saved to {}{}", path.display(), failures(*failed_probes)),
        RunOutcome::Printed { failed_probes } => {
            format!("Report printed{}", failures(*failed_probes))
        }
        RunOutcome::NoMatches { extensions } => format!(
            "No video files found (looked for {}). Use --ext to scan other extensions.",
            extensions.join(" ")
        ),
    }
}
