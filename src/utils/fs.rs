//! File system helpers shared by the engine and link maintenance.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Create `path` and all of its parents if they do not exist.
///
/// # Errors
///
/// Fails if the directory cannot be created or `path` exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            let platform_help = if crate::utils::platform::is_windows() {
                "On Windows: Check that the path length is < 260 chars or that long path support is enabled"
            } else {
                "Check directory permissions and path validity"
            };

            format!("Failed to create directory: {}\n\n{}", path.display(), platform_help)
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Write `content` to `path` through a temporary sibling file and a rename.
///
/// Readers never observe a partially written file.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Remove a file or symlink (dangling or not) at `path`. Returns `Ok(false)`
/// when nothing was there.
///
/// Symlinks are removed themselves, never followed. A real directory is left
/// in place and reported as an error.
pub fn remove_existing(path: &Path) -> Result<bool> {
    let Some(metadata) = inspect(path)? else {
        return Ok(false);
    };

    if metadata.is_dir() {
        return Err(anyhow::anyhow!("Refusing to replace directory: {}", path.display()));
    }

    remove_file_or_link(path)
        .with_context(|| format!("Failed to remove existing file: {}", path.display()))?;
    Ok(true)
}

/// Remove whatever occupies `path`, including a whole directory tree.
/// Returns `Ok(false)` when nothing was there.
pub fn remove_tree(path: &Path) -> Result<bool> {
    let Some(metadata) = inspect(path)? else {
        return Ok(false);
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    } else {
        remove_file_or_link(path)
            .with_context(|| format!("Failed to remove existing file: {}", path.display()))?;
    }
    Ok(true)
}

fn inspect(path: &Path) -> Result<Option<fs::Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to inspect {}", path.display())),
    }
}

#[cfg(windows)]
fn remove_file_or_link(path: &Path) -> std::io::Result<()> {
    // Directory symlinks on Windows must be removed as directories
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

#[cfg(not(windows))]
fn remove_file_or_link(path: &Path) -> std::io::Result<()> {
    fs::remove_file(path)
}
