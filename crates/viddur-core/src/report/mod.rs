/// Report rendering.
///
/// A [`Report`] is a read-only view over the sorted aggregates plus grand
/// totals. Each output format implements [`Renderer`]; the renderer is
/// picked once from [`ReportOptions`] and turns the report into bytes.
/// [`writer`] then puts those bytes on disk.
pub mod structured;
pub mod tabular;
pub mod text;
pub mod writer;

use crate::analysis::{sort_folders, SortDirection, SortKey};
use crate::error::ScanResult;
use crate::model::{from_micros, FolderAggregate};
use chrono::{DateTime, Local};
use std::path::Path;

pub use structured::StructuredRenderer;
pub use tabular::TabularRenderer;
pub use text::TextRenderer;
pub use writer::{report_path, write_report};

/// Output format, which also fixes the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Layout of the plain-text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTemplate {
    /// One block per folder.
    #[default]
    Summary,
    /// One block per folder plus every file in it.
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    pub format: ReportFormat,
    pub template: TextTemplate,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

/// Grand totals over every folder in a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub folders: usize,
    pub videos: usize,
    pub seconds: f64,
}

/// Sorted aggregates ready for rendering.
#[derive(Debug)]
pub struct Report<'a> {
    pub root: &'a Path,
    pub folders: Vec<&'a FolderAggregate>,
    pub totals: Totals,
    pub generated_at: DateTime<Local>,
}

impl<'a> Report<'a> {
    /// Build a report over already-sorted folders, stamped with the current
    /// time.
    pub fn new(root: &'a Path, folders: Vec<&'a FolderAggregate>) -> Self {
        let totals = Totals {
            folders: folders.len(),
            videos: folders.iter().map(|f| f.video_count()).sum(),
            seconds: from_micros(folders.iter().map(|f| f.total_micros()).sum()),
        };
        Self {
            root,
            folders,
            totals,
            generated_at: Local::now(),
        }
    }

    /// Sort `folders` per `options` and build the report.
    pub fn sorted(root: &'a Path, folders: &'a [FolderAggregate], options: &ReportOptions) -> Self {
        Self::new(root, sort_folders(folders, options.sort_key, options.direction))
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

/// One output format.
pub trait Renderer {
    fn format(&self) -> ReportFormat;

    fn render(&self, report: &Report<'_>) -> ScanResult<Vec<u8>>;
}

/// The renderer for `options.format`.
pub fn renderer_for(options: &ReportOptions) -> Box<dyn Renderer> {
    match options.format {
        ReportFormat::Text => Box::new(TextRenderer::new(options.template)),
        ReportFormat::Csv => Box::new(TabularRenderer),
        ReportFormat::Json => Box::new(StructuredRenderer),
    }
}
