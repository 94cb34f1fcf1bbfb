/// Candidate discovery using `jwalk`'s parallel directory walker.
///
/// Excluded folders are removed from each directory listing before `jwalk`
/// queues them, so an excluded subtree is never read at all. Files under it
/// cannot reach the aggregates however deep the folder sits.
use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::scanner::progress::{ScanProgress, WarningKind};
use crossbeam_channel::Sender;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Result of walking the tree.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Matching files in sorted path order.
    pub files: Vec<PathBuf>,
    /// Directories that could not be listed.
    pub unreadable: usize,
}

/// Check that `root` is an existing directory and return it as an absolute
/// path with `.` and `..` components folded away, so its base name is the
/// folder's real name.
pub fn validate_root(root: &Path) -> ScanResult<PathBuf> {
    let invalid = || ScanError::InvalidRoot {
        path: root.to_path_buf(),
    };
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => std::path::absolute(root)
            .map(|abs| normalize_lexically(&abs))
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Drop `.` components and let each `..` remove the component before it.
/// Symlinks are left unresolved.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn report_unreadable(
    found: &mut Discovered,
    progress_tx: &Sender<ScanProgress>,
    path: PathBuf,
    message: String,
) {
    found.unreadable += 1;
    warn!("Skipping unreadable folder {}: {message}", path.display());
    let _ = progress_tx.send(ScanProgress::Warning {
        kind: WarningKind::SubtreeUnreadable,
        path,
        message,
    });
}

/// Walk `root` and collect files whose extension is in the configured set.
///
/// Unreadable directories are reported on `progress_tx` as
/// [`WarningKind::SubtreeUnreadable`] and skipped.
pub fn discover(root: &Path, config: &ScanConfig, progress_tx: &Sender<ScanProgress>) -> Discovered {
    let excluded = config.excluded().clone();

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()))
        .process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|entry| match entry {
                Ok(e) => !(e.file_type().is_dir() && excluded.contains(e.file_name())),
                Err(_) => true,
            });
        });

    let mut found = Discovered::default();

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                report_unreadable(&mut found, progress_tx, path, err.to_string());
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            // A directory whose listing failed still arrives as an entry,
            // carrying the error instead of children.
            if let Some(err) = &entry.read_children_error {
                report_unreadable(&mut found, progress_tx, entry.path(), err.to_string());
            }
            continue;
        }

        let path = entry.path();
        // Symlinks are not followed for directories, but a link to a
        // regular file still counts as that file.
        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if is_file && config.matches_extension(&path) {
            found.files.push(path);
        }
    }

    found.files.sort();
    debug!(
        "Discovery under {} found {} files ({} unreadable folders)",
        root.display(),
        found.files.len(),
        found.unreadable
    );
    found
}
