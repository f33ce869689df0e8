//! Platform-specific helpers
//!
//! Home-directory expansion, executable suffix handling and platform checks.
//! Everything that differs between Windows and Unix-like systems in path
//! handling goes through here so the engine itself stays platform-neutral.
//!
//! # Examples
//!
//! ```rust,no_run
//! use just_installer::utils::platform::{expand_user, is_windows};
//!
//! # fn example() -> anyhow::Result<()> {
//! let base = expand_user("~/apps/my_app");
//! assert!(base.is_absolute());
//!
//! if is_windows() {
//!     println!("shortcuts will be created");
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Checks if the current platform is Windows.
///
/// Compile-time check used to gate Windows-only behavior such as `.lnk`
/// shortcut creation.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Gets the home directory of the current user.
///
/// # Errors
///
/// Fails when the platform does not report a home directory (for example
/// when `HOME` is unset on Unix).
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Expand a leading `~` to the current user's home directory.
///
/// `~` and `~/rest` are expanded; any other path, including already-absolute
/// ones, is returned unchanged. When the home directory cannot be determined
/// the path is left as-is, which later fails absolute-path validation.
#[must_use]
pub fn expand_user(path: &str) -> PathBuf {
    let home = || get_home_dir().ok().map(|home| home.to_string_lossy().into_owned());
    PathBuf::from(shellexpand::tilde_with_context(path, home).into_owned())
}

/// Resolve the path of an executable inside an install directory.
///
/// On platforms with an executable suffix (`.exe` on Windows) the suffix is
/// appended when `path` itself does not exist but the suffixed file does.
/// Elsewhere, and whenever `path` exists, it is returned unchanged.
#[must_use]
pub fn resolve_executable(path: &Path) -> PathBuf {
    with_executable_suffix(path, std::env::consts::EXE_SUFFIX)
}

fn with_executable_suffix(path: &Path, suffix: &str) -> PathBuf {
    if suffix.is_empty() || path.exists() {
        return path.to_path_buf();
    }

    let mut candidate = OsString::from(path.as_os_str());
    candidate.push(suffix);
    let candidate = PathBuf::from(candidate);

    if candidate.exists() {
        candidate
    } else {
        path.to_path_buf()
    }
}
