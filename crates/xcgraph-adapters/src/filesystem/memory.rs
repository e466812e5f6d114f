//! In-memory directory lister for testing.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockWriteGuard},
};

use xcgraph_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, DirectoryLister},
    },
    error::{XcGraphError, XcGraphResult},
};

type Tree = BTreeMap<PathBuf, BTreeMap<PathBuf, DirEntry>>;

/// In-memory directory tree.
///
/// Adding a path creates all of its ancestors. Clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectoryLister {
    inner: Arc<RwLock<Tree>>,
}

impl MemoryDirectoryLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from paths; a trailing `/` marks a directory.
    pub fn with_paths<'a>(paths: impl IntoIterator<Item = &'a str>) -> XcGraphResult<Self> {
        let lister = Self::new();
        for path in paths {
            match path.strip_suffix('/') {
                Some(dir) => lister.add_dir(dir)?,
                None => lister.add_file(path)?,
            }
        }
        Ok(lister)
    }

    pub fn add_file(&self, path: impl Into<PathBuf>) -> XcGraphResult<()> {
        self.insert(DirEntry::file(path))
    }

    pub fn add_dir(&self, path: impl Into<PathBuf>) -> XcGraphResult<()> {
        let entry = DirEntry::directory(path);
        let path = entry.path.clone();
        self.insert(entry)?;
        self.write()?.entry(path).or_default();
        Ok(())
    }

    /// Remove a path and everything below it.
    pub fn remove(&self, path: &Path) -> XcGraphResult<()> {
        let mut inner = self.write()?;
        inner.retain(|dir, _| !dir.starts_with(path));
        if let Some(children) = path.parent().and_then(|parent| inner.get_mut(parent)) {
            children.remove(path);
        }
        Ok(())
    }

    fn insert(&self, entry: DirEntry) -> XcGraphResult<()> {
        let mut inner = self.write()?;
        let mut child = entry;
        while let Some(parent) = child.path.parent().map(Path::to_path_buf) {
            if parent.as_os_str().is_empty() {
                break;
            }
            inner
                .entry(parent.clone())
                .or_default()
                .entry(child.path.clone())
                .or_insert(child);
            child = DirEntry::directory(parent);
        }
        Ok(())
    }

    fn write(&self) -> XcGraphResult<RwLockWriteGuard<'_, Tree>> {
        self.inner.write().map_err(|_| lock_poisoned())
    }
}

impl DirectoryLister for MemoryDirectoryLister {
    fn list(&self, path: &Path) -> XcGraphResult<Vec<DirEntry>> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;
        inner
            .get(path)
            .map(|children| children.values().cloned().collect())
            .ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "No such directory".into(),
                }
                .into()
            })
    }
}

fn lock_poisoned() -> XcGraphError {
    XcGraphError::Internal {
        message: "memory directory lister lock poisoned".into(),
    }
}
