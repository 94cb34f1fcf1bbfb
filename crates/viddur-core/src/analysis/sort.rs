/// Folder ordering for reports.
///
/// Sorting is a two-step affair: first into canonical folder-path order,
/// then a stable sort on the chosen key. Ties therefore always come out in
/// path order, and descending output is the ascending output reversed.
use crate::model::FolderAggregate;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Folder base name.
    #[default]
    Name,
    /// Total duration.
    Duration,
    /// Number of videos.
    Videos,
    /// Newest file modification time.
    Date,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [Self::Name, Self::Duration, Self::Videos, Self::Date];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Duration => "duration",
            Self::Videos => "videos",
            Self::Date => "date",
        }
    }

    fn compare(self, a: &FolderAggregate, b: &FolderAggregate) -> Ordering {
        match self {
            Self::Name => a.name().cmp(&b.name()),
            Self::Duration => a.total_micros().cmp(&b.total_micros()),
            Self::Videos => a.video_count().cmp(&b.video_count()),
            Self::Date => a.last_modified().cmp(&b.last_modified()),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort key {s:?} (expected name, duration, videos or date)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(format!("unknown sort direction {s:?} (expected asc or desc)")),
        }
    }
}

/// Order `folders` by `key` in `direction`.
pub fn sort_folders(
    folders: &[FolderAggregate],
    key: SortKey,
    direction: SortDirection,
) -> Vec<&FolderAggregate> {
    let mut sorted: Vec<&FolderAggregate> = folders.iter().collect();
    // Folder paths are unique, so this is a total order.
    sorted.sort_by(|a, b| a.folder_path().cmp(b.folder_path()));
    sorted.sort_by(|a, b| key.compare(a, b));
    if direction == SortDirection::Descending {
        sorted.reverse();
    }
    sorted
}
