/// Command-line arguments.
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use viddur_core::analysis::{SortDirection, SortKey};
use viddur_core::config::{DEFAULT_EXTENSIONS, DEFAULT_FFPROBE};
use viddur_core::report::{ReportFormat, ReportOptions, TextTemplate};

#[derive(Parser, Debug)]
#[command(
    name = "viddur",
    version,
    about = "Totals video playback time per folder",
    long_about = "Scans a folder tree for video files, reads each file's duration with ffprobe, \
                  and writes a per-folder report into the scanned folder."
)]
pub struct Cli {
    /// Folder to scan
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Folder name to skip, matched exactly against the last path component.
    /// May be repeated.
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// File extension to include (".mp4" or "mp4"). May be repeated; replaces
    /// the default set.
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Number of concurrent probes (defaults to twice the CPU count)
    #[arg(
        short = 'w',
        long,
        value_name = "N",
        env = "VIDDUR_WORKERS",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub workers: Option<u16>,

    /// ffprobe executable to run
    #[arg(long, value_name = "PATH", env = "VIDDUR_FFPROBE", default_value = DEFAULT_FFPROBE)]
    pub ffprobe: PathBuf,

    /// Read durations with the built-in container reader if ffprobe cannot be run
    #[arg(long, default_value_t = false)]
    pub allow_fallback: bool,

    /// Report format
    #[arg(short = 'f', long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Layout of the text report
    #[arg(short = 't', long, value_enum, default_value_t = TemplateArg::Summary)]
    pub template: TemplateArg,

    /// Folder sort key
    #[arg(short = 's', long, value_enum, default_value_t = SortArg::Name)]
    pub sort: SortArg,

    /// Sort direction
    #[arg(short = 'o', long, value_enum, default_value_t = OrderArg::Asc)]
    pub order: OrderArg,

    /// Print the report instead of writing it next to the videos
    #[arg(long)]
    pub stdout: bool,

    /// Hide the progress bar
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            format: self.format.into(),
            template: self.template.into(),
            sort_key: self.sort.into(),
            direction: self.order.into(),
        }
    }

    /// Extensions to scan for: the ones given, or the defaults.
    pub fn extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
        } else {
            self.extensions.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Csv,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Csv => Self::Csv,
            FormatArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateArg {
    /// One block per folder
    Summary,
    /// Every file listed under its folder
    Detailed,
}

impl From<TemplateArg> for TextTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Summary => Self::Summary,
            TemplateArg::Detailed => Self::Detailed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Folder name
    Name,
    /// Total duration
    Duration,
    /// Number of videos
    Videos,
    /// Newest file modification time
    Date,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => Self::Name,
            SortArg::Duration => Self::Duration,
            SortArg::Videos => Self::Videos,
            SortArg::Date => Self::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    #[value(alias = "ascending")]
    Asc,
    #[value(alias = "descending")]
    Desc,
}

impl From<OrderArg> for SortDirection {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => Self::Ascending,
            OrderArg::Desc => Self::Descending,
        }
    }
}
