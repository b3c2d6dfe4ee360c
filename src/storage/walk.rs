use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::error::{Result, StorageError};

/// A single file or directory found below the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl From<DirEntry> for FsEntry {
    fn from(entry: DirEntry) -> Self {
        let file_type = entry.file_type();
        // A symlink to a directory counts as a directory but is never descended into
        let is_dir = file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir());
        Self {
            path: entry.into_path(),
            is_dir,
        }
    }
}

/// Lazily walk everything below `root`, depth first
///
/// Directories are yielded before their children and siblings come in
/// file name order. The root itself is not yielded. A directory that
/// cannot be read shows up as an `Err` item at the point it was reached.
pub fn walk_entries(root: &Path) -> impl Iterator<Item = Result<FsEntry>> + use<> {
    let root = root.to_path_buf();
    WalkDir::new(&root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(move |entry| {
            entry
                .map(FsEntry::from)
                .map_err(|e| StorageError::walk(e, &root))
        })
}
