/// JSON report.
///
/// ```json
/// {
///   "summary": { "total_folders": 2, "total_videos": 3, ... },
///   "details": [ { "folder_path": "/r/A", "video_count": 2, "files": [ ... ] } ]
/// }
/// ```
///
/// Raw timestamps are Unix seconds; the `*_human` and `modified` fields are
/// local time as `YYYY-MM-DD HH:MM:SS`.
use super::{Renderer, Report, ReportFormat};
use crate::error::{ScanError, ScanResult};
use crate::model::{format_hms, format_timestamp, unix_seconds};
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub summary: Summary,
    pub details: Vec<FolderDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_folders: usize,
    pub total_videos: usize,
    pub total_duration_seconds: f64,
    pub total_duration_formatted: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderDetail {
    pub folder_path: String,
    pub video_count: usize,
    pub failed_count: usize,
    pub total_seconds: f64,
    pub total_duration_formatted: String,
    pub last_modified: f64,
    pub last_modified_human: String,
    pub files: Vec<FileDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDetail {
    pub name: String,
    pub duration_seconds: f64,
    pub duration_formatted: String,
    pub modified: String,
    pub probe_failed: bool,
}

impl StructuredReport {
    pub fn from_report(report: &Report<'_>) -> Self {
        let details = report
            .folders
            .iter()
            .map(|folder| FolderDetail {
                folder_path: folder.folder_path().to_string_lossy().into_owned(),
                video_count: folder.video_count(),
                failed_count: folder.failed_count(),
                total_seconds: folder.total_seconds(),
                total_duration_formatted: format_hms(folder.total_seconds()),
                last_modified: unix_seconds(folder.last_modified()),
                last_modified_human: format_timestamp(folder.last_modified()),
                files: folder
                    .files_by_name()
                    .into_iter()
                    .map(|file| FileDetail {
                        name: file.name.to_string(),
                        duration_seconds: file.duration_seconds,
                        duration_formatted: format_hms(file.duration_seconds),
                        modified: format_timestamp(file.modified_at),
                        probe_failed: file.probe_failed,
                    })
                    .collect(),
            })
            .collect();

        Self {
            summary: Summary {
                total_folders: report.totals.folders,
                total_videos: report.totals.videos,
                total_duration_seconds: report.totals.seconds,
                total_duration_formatted: format_hms(report.totals.seconds),
                generated_at: report.generated_at.format(TIMESTAMP_FORMAT).to_string(),
            },
            details,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredRenderer;

impl Renderer for StructuredRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(&self, report: &Report<'_>) -> ScanResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(&StructuredReport::from_report(report))
            .map_err(|e| ScanError::Render {
                format: "json",
                message: e.to_string(),
            })?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{SortDirection, SortKey};
    use crate::report::fixtures::{generated_at, mtime, scenario, MTIME};
    use crate::report::ReportOptions;
    use std::path::Path;

    fn rendered(options: &ReportOptions) -> serde_json::Value {
        let folders = scenario();
        let report =
            Report::sorted(Path::new("/r"), &folders, options).with_generated_at(generated_at());
        let bytes = StructuredRenderer.render(&report).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn summary_totals_match_details() {
        let doc = rendered(&ReportOptions::default());
        let details = doc["details"].as_array().unwrap();

        let videos: u64 = details.iter().map(|d| d["video_count"].as_u64().unwrap()).sum();
        let seconds: f64 = details.iter().map(|d| d["total_seconds"].as_f64().unwrap()).sum();
        assert_eq!(doc["summary"]["total_videos"].as_u64().unwrap(), videos);
        assert_eq!(doc["summary"]["total_duration_seconds"].as_f64().unwrap(), seconds);
        assert_eq!(doc["summary"]["total_folders"], 2);
        assert_eq!(doc["summary"]["total_duration_formatted"], "0:03:00");
        assert_eq!(
            doc["summary"]["generated_at"],
            generated_at().format(TIMESTAMP_FORMAT).to_string()
        );
    }

    #[test]
    fn details_follow_sort_order_and_files_by_name() {
        let options = ReportOptions {
            sort_key: SortKey::Videos,
            direction: SortDirection::Descending,
            ..Default::default()
        };
        let doc = rendered(&options);
        let first = &doc["details"][0];

        assert_eq!(first["folder_path"], "/r/A");
        assert_eq!(first["video_count"], 2);
        assert_eq!(first["failed_count"], 1);
        assert_eq!(first["total_seconds"], 60.0);
        assert_eq!(first["last_modified"], MTIME as f64);
        assert_eq!(first["last_modified_human"], format_timestamp(mtime()));

        let files = first["files"].as_array().unwrap();
        assert_eq!(files[0]["name"], "1.mp4");
        assert_eq!(files[0]["duration_formatted"], "0:01:00");
        assert_eq!(files[1]["name"], "2.mp4");
        assert_eq!(files[1]["duration_seconds"], 0.0);
        assert_eq!(files[1]["probe_failed"], true);
    }

    #[test]
    fn round_trips_through_typed_struct() {
        let folders = scenario();
        let report = Report::sorted(Path::new("/r"), &folders, &ReportOptions::default())
            .with_generated_at(generated_at());
        let bytes = StructuredRenderer.render(&report).unwrap();
        let parsed: StructuredReport = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, StructuredReport::from_report(&report));
    }
}
