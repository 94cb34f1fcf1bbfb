/// Single-writer aggregation of probe results into per-folder totals.
///
/// The aggregator is fed by the closure passed to
/// [`resolve_all`](crate::scanner::resolver::resolve_all), which only ever
/// runs on the scan thread. It takes `&mut self` and is never shared, so
/// the running sums cannot race.
use crate::model::{FolderAggregate, VideoFile};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct Aggregator {
    /// Keyed by folder path; the BTreeMap order is the canonical pre-sort
    /// order used by the sorter.
    folders: BTreeMap<PathBuf, FolderAggregate>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one file to its parent folder, creating the aggregate on first use.
    pub fn absorb(&mut self, file: VideoFile) {
        match self.folders.get_mut(&file.folder) {
            Some(folder) => folder.push(file),
            None => {
                self.folders.insert(file.folder.clone(), FolderAggregate::new(file));
            }
        }
    }

    /// Freeze the aggregates, in folder path order.
    pub fn finish(self) -> Vec<FolderAggregate> {
        self.folders.into_values().collect()
    }
}
