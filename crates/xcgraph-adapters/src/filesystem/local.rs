//! Local directory lister using `walkdir`.

use std::path::Path;

use walkdir::WalkDir;

use xcgraph_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, DirectoryLister},
    },
    error::{XcGraphError, XcGraphResult},
};

/// Production directory lister reading the real file system.
///
/// Symbolic links are followed, so a linked folder lists as a directory.
#[derive(Debug, Clone, Copy)]
pub struct LocalDirectoryLister;

impl LocalDirectoryLister {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalDirectoryLister {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryLister for LocalDirectoryLister {
    fn list(&self, path: &Path) -> XcGraphResult<Vec<DirEntry>> {
        if !path.is_dir() {
            return Err(map_error(path, "not a directory"));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| map_error(path, e))?;
            let child = entry.path().to_path_buf();
            if entry.file_type().is_dir() {
                entries.push(DirEntry::directory(child));
            } else {
                entries.push(DirEntry::file(child));
            }
        }
        Ok(entries)
    }
}

fn map_error(path: &Path, e: impl std::fmt::Display) -> XcGraphError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to list directory: {}", e),
    }
    .into()
}
