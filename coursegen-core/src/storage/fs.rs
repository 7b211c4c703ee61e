//! Real filesystem backend

use super::{child_path, StorageBackend};
use crate::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// [`StorageBackend`] over `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for FsStorage {
    fn create_directory(&self, parent: &Path, name: &str) -> crate::Result<PathBuf> {
        let path = child_path(parent, name)?;
        std::fs::create_dir(&path).map_err(|e| Error::io(&path, e))?;
        debug!("created directory {}", path.display());
        Ok(path)
    }

    fn create_file(&self, parent: &Path, name: &str, content: &[u8]) -> crate::Result<PathBuf> {
        let path = child_path(parent, name)?;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        file.write_all(content).map_err(|e| Error::io(&path, e))?;
        debug!("created file {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove(&self, path: &Path) -> crate::Result<()> {
        let metadata = std::fs::symlink_metadata(path).map_err(|e| Error::io(path, e))?;
        if metadata.is_dir() {
            std::fs::remove_dir_all(path).map_err(|e| Error::io(path, e))?;
        } else {
            std::fs::remove_file(path).map_err(|e| Error::io(path, e))?;
        }
        debug!("removed {}", path.display());
        Ok(())
    }

    fn set_executable(&self, path: &Path) -> crate::Result<()> {
        match coursegen_utils::make_executable(path) {
            Ok(changed) => {
                debug!("{} executable (changed: {})", path.display(), changed);
                Ok(())
            }
            Err(coursegen_utils::UtilError::Io(e)) => Err(Error::io(path, e)),
            Err(e) => Err(e.into()),
        }
    }
}
