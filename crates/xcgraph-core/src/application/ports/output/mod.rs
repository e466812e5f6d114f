//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `xcgraph-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::classification::is_bundle_directory;
use crate::error::XcGraphResult;

/// What kind of file-system entry a listing returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    /// A directory; `bundle` is set when its suffix marks it as atomic.
    Directory { bundle: bool },
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    /// A directory entry, flagged as a bundle when its name has a suffix.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let bundle = is_bundle_directory(&path);
        Self {
            path,
            kind: EntryKind::Directory { bundle },
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory { .. })
    }

    pub fn is_bundle(&self) -> bool {
        matches!(self.kind, EntryKind::Directory { bundle: true })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Port for enumerating directories.
///
/// Implemented by:
/// - `xcgraph_adapters::filesystem::LocalDirectoryLister` (production)
/// - `xcgraph_adapters::filesystem::MemoryDirectoryLister` (testing)
///
/// ## Design Notes
///
/// - Paths are absolute; returned entries carry absolute paths
/// - Only immediate children are returned, in no particular order
/// - Implementations may be called from several threads at once
#[cfg_attr(test, mockall::automock)]
pub trait DirectoryLister: Send + Sync {
    /// List the immediate children of `path`.
    fn list(&self, path: &Path) -> XcGraphResult<Vec<DirEntry>>;
}
