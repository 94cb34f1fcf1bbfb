/// Terminal progress display.
///
/// Drains a scan's progress channel on the main thread, drawing an
/// `indicatif` bar over probe completions. Warnings are printed above the
/// bar as they arrive so they stay visible once it is cleared.
use crossbeam_channel::Receiver;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use viddur_core::ScanProgress;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// What the display saw, for the closing summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub probe: Option<&'static str>,
    pub warnings: usize,
}

/// Consume `rx` until the scan thread drops its sender.
///
/// With `visible == false` nothing is drawn but warnings are still printed
/// to stderr.
pub fn drain(rx: &Receiver<ScanProgress>, visible: bool) -> ProgressSummary {
    let bar = if visible {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    bar.set_message("Discovering files");
    bar.enable_steady_tick(Duration::from_millis(100));

    let mut summary = ProgressSummary::default();

    for msg in rx.iter() {
        match msg {
            ScanProgress::ProbeSelected { name } => {
                summary.probe = Some(name);
                bar.set_message(format!("Discovering files (probe: {name})"));
            }
            ScanProgress::Discovered { files_found } => {
                bar.set_length(files_found as u64);
                if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                    bar.set_style(style.progress_chars("=> "));
                }
                bar.set_message("Probing");
            }
            ScanProgress::Probed { completed, .. } => {
                bar.set_position(completed as u64);
            }
            ScanProgress::Warning { kind, path, message } => {
                summary.warnings += 1;
                let line = format!("warning: {} {}: {message}", kind.label(), path.display());
                if visible {
                    bar.println(line);
                } else {
                    eprintln!("{line}");
                }
            }
            ScanProgress::Complete { .. } => {
                bar.set_message("Done");
            }
        }
    }

    bar.finish_and_clear();
    summary
}
