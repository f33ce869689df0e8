//! OS primitives for creating links to the installed entry point.
//!
//! The policy of *which* links to create, overwriting and fault isolation
//! lives in the engine; implementations of [`LinkProvisioner`] only create a
//! single link at a path whose parent directory already exists and which is
//! guaranteed to be free.

#[cfg(not(windows))]
use crate::core::InstallerError;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Creates links pointing at an executable.
pub trait LinkProvisioner: Send + Sync {
    /// Create a symbolic link at `link` pointing to `target`.
    fn create_symlink(&self, target: &Path, link: &Path) -> Result<()>;

    /// Create a Windows shortcut (`.lnk`) at `shortcut` pointing to `target`.
    fn create_shortcut(&self, target: &Path, shortcut: &Path) -> Result<()>;
}

/// Link provisioner backed by the operating system.
///
/// Symlinks use the native API on each platform. Shortcuts are written by a
/// short PowerShell script driving `WScript.Shell`, and are unsupported
/// outside Windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLinkProvisioner;

impl LinkProvisioner for SystemLinkProvisioner {
    fn create_symlink(&self, target: &Path, link: &Path) -> Result<()> {
        debug!("Linking {} -> {}", link.display(), target.display());

        #[cfg(unix)]
        std::os::unix::fs::symlink(target, link)
            .with_context(|| format!("Failed to create symlink {}", link.display()))?;

        #[cfg(windows)]
        std::os::windows::fs::symlink_file(target, link)
            .with_context(|| format!("Failed to create symlink {}", link.display()))?;

        Ok(())
    }

    #[cfg(windows)]
    fn create_shortcut(&self, target: &Path, shortcut: &Path) -> Result<()> {
        use std::process::Command;

        debug!("Creating shortcut {} -> {}", shortcut.display(), target.display());
        let script = format!(
            "$WshShell = New-Object -ComObject WScript.Shell; \
             $Shortcut = $WshShell.CreateShortcut('{}'); \
             $Shortcut.TargetPath = '{}'; \
             $Shortcut.WorkingDirectory = '{}'; \
             $Shortcut.Save()",
            escape_single_quotes(&shortcut.display().to_string()),
            escape_single_quotes(&target.display().to_string()),
            escape_single_quotes(
                &target.parent().map(|p| p.display().to_string()).unwrap_or_default()
            ),
        );

        let output = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .output()
            .context("Failed to run powershell")?;

        if !output.status.success() {
            anyhow::bail!(
                "Failed to create shortcut {}: {}",
                shortcut.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }

    #[cfg(not(windows))]
    fn create_shortcut(&self, _target: &Path, shortcut: &Path) -> Result<()> {
        Err(InstallerError::PlatformNotSupported {
            operation: format!("create shortcut {}", shortcut.display()),
        }
        .into())
    }
}

/// PowerShell single-quoted strings escape `'` by doubling it.
#[cfg_attr(not(windows), allow(dead_code))]
fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "''")
}
