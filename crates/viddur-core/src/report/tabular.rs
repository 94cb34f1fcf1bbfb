/// CSV report: one row per file.
///
/// Columns are fixed: folder absolute path, folder path relative to the
/// scan root (`.` for the root itself), file name, duration in seconds to
/// two decimals, `H:MM:SS` duration. Folders follow the report order and
/// files within a folder are sorted by name.
use super::{Renderer, Report, ReportFormat};
use crate::error::{ScanError, ScanResult};
use crate::model::format_hms;
use std::path::Path;

pub const HEADER: [&str; 5] = [
    "Folder Path",
    "Relative Path",
    "File Name",
    "Duration (Seconds)",
    "Duration (H:MM:SS)",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct TabularRenderer;

fn render_error(err: impl std::fmt::Display) -> ScanError {
    ScanError::Render {
        format: "csv",
        message: err.to_string(),
    }
}

/// `folder` relative to `root`, with `.` standing in for the root itself.
fn relative_path(root: &Path, folder: &Path) -> String {
    match folder.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => folder.to_string_lossy().into_owned(),
    }
}

impl Renderer for TabularRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }

    fn render(&self, report: &Report<'_>) -> ScanResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER).map_err(render_error)?;

        for folder in &report.folders {
            let folder_path = folder.folder_path().to_string_lossy();
            let relative = relative_path(report.root, folder.folder_path());
            for file in folder.files_by_name() {
                writer
                    .write_record([
                        &*folder_path,
                        relative.as_str(),
                        file.name.as_str(),
                        format!("{:.2}", file.duration_seconds).as_str(),
                        format_hms(file.duration_seconds).as_str(),
                    ])
                    .map_err(render_error)?;
            }
        }

        writer.into_inner().map_err(render_error)
    }
}
