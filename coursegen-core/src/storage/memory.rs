//! In-memory backend
//!
//! Used for dry runs and tests. Single-threaded: interior mutability is a
//! `RefCell`, so the backend is not `Sync`.

use super::{child_path, StorageBackend};
use crate::Error;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Dir,
    File(Vec<u8>),
}

/// In-memory tree of directories and files
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<PathBuf, Entry>>,
    denied: RefCell<BTreeSet<PathBuf>>,
    executable: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend containing the directory `root` (and its ancestors)
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let storage = Self::new();
        storage.add_dir_all(root.as_ref());
        storage
    }

    /// Create `path` and its ancestors as directories
    pub fn add_dir_all(&self, path: &Path) {
        let mut entries = self.entries.borrow_mut();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            entries.insert(ancestor.to_path_buf(), Entry::Dir);
        }
    }

    /// Make every write at or below `path` fail with `PermissionDenied`
    pub fn deny_writes(&self, path: impl Into<PathBuf>) {
        self.denied.borrow_mut().insert(path.into());
    }

    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        match self.entries.borrow().get(path) {
            Some(Entry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.executable.borrow().contains(path)
    }

    pub fn read_to_string(&self, path: &Path) -> Option<String> {
        self.read(path).and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Names of the direct children of `dir`, sorted
    pub fn children(&self, dir: &Path) -> Vec<String> {
        self.entries
            .borrow()
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }

    /// Every path strictly below `root`, relative to it, sorted
    pub fn relative_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.entries
            .borrow()
            .keys()
            .filter_map(|path| path.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect()
    }

    fn check_denied(&self, path: &Path) -> crate::Result<()> {
        if self.denied.borrow().iter().any(|denied| path.starts_with(denied)) {
            return Err(Error::io(path, io::Error::from(io::ErrorKind::PermissionDenied)));
        }
        Ok(())
    }

    fn check_writable(&self, parent: &Path, path: &Path) -> crate::Result<()> {
        self.check_denied(path)?;
        if self.entries.borrow().get(parent) != Some(&Entry::Dir) {
            return Err(Error::io(path, io::Error::from(io::ErrorKind::NotFound)));
        }
        if self.entries.borrow().contains_key(path) {
            return Err(Error::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

impl StorageBackend for MemoryStorage {
    fn create_directory(&self, parent: &Path, name: &str) -> crate::Result<PathBuf> {
        let path = child_path(parent, name)?;
        self.check_writable(parent, &path)?;
        self.entries.borrow_mut().insert(path.clone(), Entry::Dir);
        Ok(path)
    }

    fn create_file(&self, parent: &Path, name: &str, content: &[u8]) -> crate::Result<PathBuf> {
        let path = child_path(parent, name)?;
        self.check_writable(parent, &path)?;
        self.entries
            .borrow_mut()
            .insert(path.clone(), Entry::File(content.to_vec()));
        Ok(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries.borrow().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.entries.borrow().get(path) == Some(&Entry::Dir)
    }

    fn remove(&self, path: &Path) -> crate::Result<()> {
        if !self.exists(path) {
            return Err(Error::io(path, io::Error::from(io::ErrorKind::NotFound)));
        }
        self.entries
            .borrow_mut()
            .retain(|entry, _| !entry.starts_with(path));
        self.executable
            .borrow_mut()
            .retain(|entry| !entry.starts_with(path));
        Ok(())
    }

    fn set_executable(&self, path: &Path) -> crate::Result<()> {
        self.check_denied(path)?;
        if !matches!(self.entries.borrow().get(path), Some(Entry::File(_))) {
            return Err(Error::io(path, io::Error::from(io::ErrorKind::NotFound)));
        }
        self.executable.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }
}
