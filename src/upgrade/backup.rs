use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::constants::BACKUP_SUFFIX;

/// Moves an existing install directory aside before a fresh extraction.
///
/// The backup lives next to the install directory with a `_backup` suffix,
/// e.g. `~/apps/my_app/version_1.2` is kept as
/// `~/apps/my_app/version_1.2_backup`. Only one generation is kept: an older
/// backup is deleted before the current directory is renamed.
///
/// Extraction therefore always starts from an empty destination, and the
/// previous good install survives as a backup until the next swap.
///
/// # Examples
///
/// ```rust,no_run
/// use just_installer::upgrade::backup::BackupManager;
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let manager = BackupManager::new(PathBuf::from("/opt/my_app/version_1.2"));
///
/// if manager.swap_out().await? {
///     println!("previous install kept at {}", manager.backup_path().display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BackupManager {
    /// Directory a version is installed into.
    install_dir: PathBuf,
    /// Sibling directory holding the previous content.
    backup_dir: PathBuf,
}

impl BackupManager {
    /// Create a manager for `install_dir`; the backup path is derived by
    /// appending `_backup` to the directory name.
    pub fn new(install_dir: PathBuf) -> Self {
        let mut backup_dir = OsString::from(install_dir.as_os_str());
        backup_dir.push(BACKUP_SUFFIX);

        Self {
            install_dir,
            backup_dir: PathBuf::from(backup_dir),
        }
    }

    /// Rename the install directory to the backup path if it exists.
    ///
    /// A previous backup is deleted first. Returns `true` when a backup was
    /// made and `false` when there was nothing to move.
    ///
    /// # Errors
    ///
    /// Fails when the old backup cannot be deleted or the rename fails. In
    /// both cases the install directory is left where it was.
    pub async fn swap_out(&self) -> Result<bool> {
        if fs::symlink_metadata(&self.install_dir).await.is_err() {
            debug!("Nothing to back up at {:?}", self.install_dir);
            return Ok(false);
        }

        if fs::symlink_metadata(&self.backup_dir).await.is_ok() {
            debug!("Removing old backup at {:?}", self.backup_dir);
            remove_path(&self.backup_dir).await.context("Failed to remove old backup")?;
        }

        info!("Moving {:?} to {:?}", self.install_dir, self.backup_dir);
        fs::rename(&self.install_dir, &self.backup_dir)
            .await
            .with_context(|| format!("Failed to back up {}", self.install_dir.display()))?;

        Ok(true)
    }

    /// Put the backup back in place of the install directory.
    ///
    /// This is a manual recovery step; installs never call it. Retries up to
    /// three times because Windows may keep files of a just-exited process
    /// locked for a moment.
    pub async fn restore_backup(&self) -> Result<()> {
        if !self.backup_exists() {
            bail!("No backup found at {:?}", self.backup_dir);
        }

        warn!("Restoring from backup at {:?}", self.backup_dir);

        let mut attempts = 0;
        const MAX_ATTEMPTS: u32 = 3;

        while attempts < MAX_ATTEMPTS {
            match self.attempt_restore().await {
                Ok(()) => {
                    info!("Successfully restored from backup");
                    return Ok(());
                }
                Err(e) if attempts < MAX_ATTEMPTS - 1 => {
                    warn!("Restore attempt {} failed: {}. Retrying...", attempts + 1, e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }

        bail!("Failed to restore backup after {MAX_ATTEMPTS} attempts")
    }

    async fn attempt_restore(&self) -> Result<()> {
        if fs::symlink_metadata(&self.install_dir).await.is_ok() {
            remove_path(&self.install_dir)
                .await
                .context("Failed to remove current install directory")?;
        }

        fs::rename(&self.backup_dir, &self.install_dir).await.context("Failed to restore backup")?;
        Ok(())
    }

    pub fn backup_exists(&self) -> bool {
        self.backup_dir.exists()
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_dir
    }
}

async fn remove_path(path: &Path) -> std::io::Result<()> {
    if fs::symlink_metadata(path).await?.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_derivation() {
        let manager = BackupManager::new(PathBuf::from("/opt/app/version_1.2"));
        assert_eq!(manager.backup_path(), Path::new("/opt/app/version_1.2_backup"));
    }

    #[tokio::test]
    async fn test_swap_out_without_install_is_noop() {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(temp.path().join("version_1.0"));

        assert!(!manager.swap_out().await.unwrap());
        assert!(!manager.backup_exists());
    }

    #[tokio::test]
    async fn test_swap_out_moves_directory() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("version_1.0");
        fs::create_dir_all(&install).await.unwrap();
        fs::write(install.join("app"), b"v1").await.unwrap();

        let manager = BackupManager::new(install.clone());
        assert!(manager.swap_out().await.unwrap());

        assert!(!install.exists());
        assert_eq!(fs::read(manager.backup_path().join("app")).await.unwrap(), b"v1");
    }

    #[tokio::test]
    async fn test_swap_out_replaces_old_backup() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("version_1.0");
        let manager = BackupManager::new(install.clone());

        fs::create_dir_all(manager.backup_path()).await.unwrap();
        fs::write(manager.backup_path().join("stale"), b"old").await.unwrap();
        fs::create_dir_all(&install).await.unwrap();
        fs::write(install.join("app"), b"current").await.unwrap();

        manager.swap_out().await.unwrap();

        assert!(!manager.backup_path().join("stale").exists());
        assert_eq!(fs::read(manager.backup_path().join("app")).await.unwrap(), b"current");
    }

    #[tokio::test]
    async fn test_restore_backup() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("version_1.0");
        fs::create_dir_all(&install).await.unwrap();
        fs::write(install.join("app"), b"good").await.unwrap();

        let manager = BackupManager::new(install.clone());
        manager.swap_out().await.unwrap();

        fs::create_dir_all(&install).await.unwrap();
        fs::write(install.join("app"), b"broken").await.unwrap();

        manager.restore_backup().await.unwrap();
        assert_eq!(fs::read(install.join("app")).await.unwrap(), b"good");
        assert!(!manager.backup_exists());
    }

    #[tokio::test]
    async fn test_restore_without_backup_fails() {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(temp.path().join("version_1.0"));

        let err = manager.restore_backup().await.unwrap_err();
        assert!(err.to_string().contains("No backup found"));
    }
}
