/// Plain-text reports.
///
/// ```text
/// Video Duration
/// ========================================
/// Folder: Season 1
///   -> Videos:  12 | Duration: 4:48:10
/// ----------------------------------------
/// TOTALS
///   -> Total Folders: 1
///   -> Total Videos: 12
///   -> Total Duration: 4:48:10
/// ========================================
/// ```
///
/// The detailed template adds one `     - name | H:MM:SS` line per file,
/// sorted by file name, after each folder's count line.
use super::{Renderer, Report, ReportFormat, TextTemplate};
use crate::error::ScanResult;
use crate::model::format_hms;
use std::fmt::Write;

const TITLE: &str = "Video Duration";
const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    template: TextTemplate,
}

impl TextRenderer {
    pub fn new(template: TextTemplate) -> Self {
        Self { template }
    }

    /// Render to a `String`. Every line, the last included, ends in `\n`.
    pub fn render_string(&self, report: &Report<'_>) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);
        let mut out = String::with_capacity(128 + report.folders.len() * 96);

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{TITLE}");
        let _ = writeln!(out, "{heavy}");

        for folder in &report.folders {
            let _ = writeln!(out, "Folder: {}", folder.name());
            let _ = writeln!(
                out,
                "  -> Videos: {:>3} | Duration: {}",
                folder.video_count(),
                format_hms(folder.total_seconds())
            );
            if self.template == TextTemplate::Detailed {
                for file in folder.files_by_name() {
                    let _ = write!(
                        out,
                        "     - {} | {}",
                        file.name,
                        format_hms(file.duration_seconds)
                    );
                    if file.probe_failed {
                        out.push_str(" (probe failed)");
                    }
                    out.push('\n');
                }
            }
            let _ = writeln!(out, "{light}");
        }

        let _ = writeln!(out, "TOTALS");
        let _ = writeln!(out, "  -> Total Folders: {}", report.totals.folders);
        let _ = writeln!(out, "  -> Total Videos: {}", report.totals.videos);
        let _ = writeln!(out, "  -> Total Duration: {}", format_hms(report.totals.seconds));
        let _ = writeln!(out, "{heavy}");
        out
    }
}

impl Renderer for TextRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, report: &Report<'_>) -> ScanResult<Vec<u8>> {
        Ok(self.render_string(report).into_bytes())
    }
}
