/// Analysis modules: post-scan ordering of the folder aggregates.
pub mod sort;

pub use sort::{sort_folders, SortDirection, SortKey};
