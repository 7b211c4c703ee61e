//! Storage backends
//!
//! The materializer and the delete actions only ever talk to a
//! [`StorageBackend`]. Both operations that create entries refuse to replace
//! an existing one and report [`crate::Error::AlreadyExists`] instead.

pub mod fs;
pub mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

use std::path::{Path, PathBuf};

/// Directory/file creation, removal and permissions
pub trait StorageBackend {
    /// Create `parent/name` as a directory; `parent` must exist
    fn create_directory(&self, parent: &Path, name: &str) -> crate::Result<PathBuf>;

    /// Create `parent/name` holding `content`; `parent` must exist
    fn create_file(&self, parent: &Path, name: &str, content: &[u8]) -> crate::Result<PathBuf>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a file, or a directory with everything below it
    fn remove(&self, path: &Path) -> crate::Result<()>;

    /// Add the executable bits to an existing file
    fn set_executable(&self, path: &Path) -> crate::Result<()>;
}

impl<S: StorageBackend + ?Sized> StorageBackend for &S {
    fn create_directory(&self, parent: &Path, name: &str) -> crate::Result<PathBuf> {
        (**self).create_directory(parent, name)
    }

    fn create_file(&self, parent: &Path, name: &str, content: &[u8]) -> crate::Result<PathBuf> {
        (**self).create_file(parent, name, content)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn remove(&self, path: &Path) -> crate::Result<()> {
        (**self).remove(path)
    }

    fn set_executable(&self, path: &Path) -> crate::Result<()> {
        (**self).set_executable(path)
    }
}

/// Entry names must be a single path segment
pub(crate) fn child_path(parent: &Path, name: &str) -> crate::Result<PathBuf> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(crate::Error::InvalidTarget(format!(
            "Invalid entry name {:?} under {}",
            name,
            parent.display()
        )));
    }
    Ok(parent.join(name))
}
