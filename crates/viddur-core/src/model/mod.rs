/// Data model: probed files and the per-folder aggregates built from them.
pub mod folder;
pub mod format;
pub mod video_file;

pub use folder::{from_micros, to_micros, FolderAggregate};
pub use format::{format_hms, format_timestamp, unix_seconds};
pub use video_file::VideoFile;
