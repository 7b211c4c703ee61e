//! File system helpers
//!
//! Course descriptors key their files by slash separated paths such as
//! `lesson2/task1/testA.txt`. These helpers turn such keys into names on
//! disk and take care of the few permission tweaks a generated project needs.

use std::fs;
use std::path::{Path, PathBuf};

/// Final segment of a descriptor key.
///
/// Both `/` and `\` count as separators, since descriptors written on
/// Windows use the latter. A key without separators is returned unchanged.
pub fn base_name(key: &str) -> &str {
    let trimmed = key.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Safely join paths, refusing absolute paths and `..` traversal
pub fn safe_path_join(base: &Path, relative: &Path) -> crate::Result<PathBuf> {
    let normalized = normalize_path(relative);

    if normalized.is_absolute() || normalized.starts_with("..") {
        return Err(crate::UtilError::PathOperation(format!(
            "Unsafe path join attempted: {:?} + {:?}",
            base, relative
        )));
    }

    Ok(base.join(normalized))
}

/// Lexically normalize a path (`a/b/../c` becomes `a/c`)
pub fn normalize_path(path: &Path) -> PathBuf {
    path_clean::clean(path)
}

/// Ensure directory exists, creating parents as needed
pub fn ensure_dir(path: &Path) -> crate::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(crate::UtilError::PathOperation(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Add the executable bits to a file, keeping its other permissions.
///
/// Returns `Ok(false)` when the file was already executable.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> crate::Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    let mode = permissions.mode();
    if mode & 0o111 == 0o111 {
        return Ok(false);
    }
    permissions.set_mode(mode | 0o111);
    fs::set_permissions(path, permissions)?;
    Ok(true)
}

/// Windows has no executable bit; only check that the file is there.
#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> crate::Result<bool> {
    fs::metadata(path)?;
    Ok(false)
}
