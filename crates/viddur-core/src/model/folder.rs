/// Per-folder running totals.
///
/// A `FolderAggregate` only exists once its first file arrives, so every
/// aggregate holds at least one file. `total_seconds`, `video_count`,
/// `failed_count` and `last_modified` are denormalized and updated in the
/// same call that appends a file; they are never recomputed at render time.
///
/// Durations are summed as whole microseconds. Integer addition does not
/// depend on the order files arrive in, so the totals (and any ordering
/// built on them) are the same for every arrival order.
use super::video_file::VideoFile;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub struct FolderAggregate {
    folder_path: PathBuf,
    /// Insertion (completion) order.
    files: Vec<VideoFile>,
    total_micros: u64,
    video_count: usize,
    failed_count: usize,
    last_modified: SystemTime,
}

impl FolderAggregate {
    /// Start an aggregate from its first file. The folder key is the file's
    /// parent directory.
    pub fn new(first: VideoFile) -> Self {
        let mut aggregate = Self {
            folder_path: first.folder.clone(),
            files: Vec::with_capacity(8),
            total_micros: 0,
            video_count: 0,
            failed_count: 0,
            last_modified: first.modified_at,
        };
        aggregate.push(first);
        aggregate
    }

    /// Append a file and roll its duration, count and mtime into the totals.
    pub fn push(&mut self, file: VideoFile) {
        debug_assert_eq!(
            file.folder, self.folder_path,
            "file pushed into the wrong folder aggregate"
        );
        self.total_micros = self.total_micros.saturating_add(to_micros(file.duration_seconds));
        self.video_count += 1;
        if file.probe_failed {
            self.failed_count += 1;
        }
        if file.modified_at > self.last_modified {
            self.last_modified = file.modified_at;
        }
        self.files.push(file);
    }

    pub fn folder_path(&self) -> &Path {
        &self.folder_path
    }

    /// Base name of the folder, or the whole path for roots such as `/`.
    pub fn name(&self) -> String {
        match self.folder_path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.folder_path.to_string_lossy().into_owned(),
        }
    }

    /// Files in insertion order.
    pub fn files(&self) -> &[VideoFile] {
        &self.files
    }

    /// Files sorted by name, ties broken by full path.
    pub fn files_by_name(&self) -> Vec<&VideoFile> {
        let mut files: Vec<&VideoFile> = self.files.iter().collect();
        files.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        files
    }

    pub fn total_seconds(&self) -> f64 {
        from_micros(self.total_micros)
    }

    /// Exact total duration in microseconds.
    pub fn total_micros(&self) -> u64 {
        self.total_micros
    }

    pub fn video_count(&self) -> usize {
        self.video_count
    }

    /// Files counted in `video_count` whose probe failed.
    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    /// Newest modification time among the member files.
    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }
}

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Seconds to whole microseconds, rounded. Input is finite and `>= 0`.
pub fn to_micros(seconds: f64) -> u64 {
    (seconds * MICROS_PER_SECOND).round() as u64
}

pub fn from_micros(micros: u64) -> f64 {
    micros as f64 / MICROS_PER_SECOND
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_push_keeps_totals_in_step() {
        let mut folder = FolderAggregate::new(VideoFile::new("/m/a/2.mp4".into(), 30.0, at(10)));
        folder.push(VideoFile::new("/m/a/1.mp4".into(), 12.5, at(50)));
        folder.push(VideoFile::failed("/m/a/3.mp4".into(), at(20)));

        assert_eq!(folder.video_count(), 3);
        assert_eq!(folder.files().len(), 3);
        assert_eq!(folder.failed_count(), 1);
        assert_eq!(folder.total_seconds(), 42.5);
        let summed: f64 = folder.files().iter().map(|f| f.duration_seconds).sum();
        assert_eq!(folder.total_seconds(), summed);
        assert_eq!(folder.last_modified(), at(50));
    }

    #[test]
    fn test_totals_do_not_depend_on_arrival_order() {
        const SECS: [f64; 6] = [0.1, 0.2, 0.3, 1.0 / 3.0, 2.75, 0.7];
        fn build(order: &[usize]) -> FolderAggregate {
            let mut files = order
                .iter()
                .map(|&i| VideoFile::new(format!("/m/a/{i}.mp4").into(), SECS[i], at(0)));
            let mut folder = FolderAggregate::new(files.next().unwrap());
            files.for_each(|f| folder.push(f));
            folder
        }

        let forward = build(&[0, 1, 2, 3, 4, 5]);
        let backward = build(&[5, 4, 3, 2, 1, 0]);
        let shuffled = build(&[3, 0, 5, 2, 4, 1]);
        assert_eq!(forward.total_micros(), backward.total_micros());
        assert_eq!(forward.total_micros(), shuffled.total_micros());
        assert_eq!(forward.total_seconds().to_bits(), backward.total_seconds().to_bits());

        // 0.1 + 0.2 + 0.3 lands exactly on 0.6.
        let small = build(&[0, 1, 2]);
        assert_eq!(small.total_seconds(), 0.6);
    }

    #[test]
    fn test_files_by_name() {
        let mut folder = FolderAggregate::new(VideoFile::new("/m/b.mkv".into(), 1.0, at(0)));
        folder.push(VideoFile::new("/m/a.mkv".into(), 1.0, at(0)));
        folder.push(VideoFile::new("/m/c.mkv".into(), 1.0, at(0)));

        let names: Vec<&str> = folder.files_by_name().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.mkv", "b.mkv", "c.mkv"]);
        // Insertion order is untouched.
        assert_eq!(folder.files()[0].name, "b.mkv");
    }

    #[test]
    fn test_name_of_nested_and_root_folders() {
        let nested = FolderAggregate::new(VideoFile::new("/media/Season 1/e.mp4".into(), 1.0, at(0)));
        assert_eq!(nested.name(), "Season 1");

        let root = FolderAggregate::new(VideoFile::new("/e.mp4".into(), 1.0, at(0)));
        assert_eq!(root.name(), "/");
    }
}
