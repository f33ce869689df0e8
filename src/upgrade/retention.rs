//! Pruning of old version directories.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::backup::BackupManager;
use super::events::EventSink;
use crate::utils::remove_tree;
use crate::version::{Version, match_version};

/// Installed version directories found under a base path, newest first.
pub async fn installed_versions(base: &Path, template: &str) -> std::io::Result<Vec<(Version, PathBuf)>> {
    let mut found = Vec::new();
    let mut entries = fs::read_dir(base).await?;

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(version) = name.to_str().and_then(|name| match_version(template, name)) else {
            continue;
        };
        found.push((version, entry.path()));
    }

    found.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(found)
}

/// Delete all but the `keep` newest installs together with their backups.
///
/// Versions listed in `protected` survive regardless of their age. Returns
/// the directories that were removed.
pub async fn prune_versions(
    base: &Path,
    template: &str,
    keep: usize,
    protected: &[&Version],
    events: &EventSink,
) -> Vec<PathBuf> {
    let installed = match installed_versions(base, template).await {
        Ok(installed) => installed,
        Err(e) => {
            events.error(&format!("Failed to scan {} for old versions: {e}", base.display()));
            return Vec::new();
        }
    };

    let mut removed = Vec::new();
    for (version, path) in installed.into_iter().skip(keep) {
        if protected.contains(&&version) {
            debug!("Keeping protected version {version}");
            continue;
        }

        let backup = BackupManager::new(path.clone());
        match remove_tree(&path).and_then(|_| remove_tree(backup.backup_path())) {
            Ok(_) => {
                events.info(&format!("Removed old version {version}"));
                removed.push(path);
            }
            Err(e) => events.error(&format!("Failed to remove old version {version}: {e:#}")),
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn install(base: &Path, name: &str) -> PathBuf {
        let path = base.join(name);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_installed_versions_sorted_newest_first() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), "app_1.2");
        install(temp.path(), "app_1.10");
        install(temp.path(), "app_1.2_backup");
        install(temp.path(), "settings");
        std::fs::write(temp.path().join("app_9.9"), b"not a dir").unwrap();

        let found = installed_versions(temp.path(), "app_{version}").await.unwrap();
        let versions: Vec<_> = found.into_iter().map(|(v, _)| v).collect();
        assert_eq!(versions, vec![Version::new(1, 10), Version::new(1, 2)]);
    }

    #[tokio::test]
    async fn test_prune_keeps_newest_and_protected() {
        let temp = TempDir::new().unwrap();
        for name in ["app_1.0", "app_1.0_backup", "app_2.0", "app_3.0", "app_4.0"] {
            install(temp.path(), name);
        }

        let running = Version::new(1, 0);
        let removed =
            prune_versions(temp.path(), "app_{version}", 2, &[&running], &EventSink::new()).await;

        assert_eq!(removed, vec![temp.path().join("app_2.0")]);
        assert!(temp.path().join("app_4.0").exists());
        assert!(temp.path().join("app_3.0").exists());
        assert!(temp.path().join("app_1.0").exists());
        assert!(temp.path().join("app_1.0_backup").exists());
    }

    #[tokio::test]
    async fn test_prune_removes_backups() {
        let temp = TempDir::new().unwrap();
        for name in ["app_1.0", "app_1.0_backup", "app_2.0"] {
            install(temp.path(), name);
        }

        prune_versions(temp.path(), "app_{version}", 1, &[], &EventSink::new()).await;

        assert!(!temp.path().join("app_1.0").exists());
        assert!(!temp.path().join("app_1.0_backup").exists());
        assert!(temp.path().join("app_2.0").exists());
    }
}
