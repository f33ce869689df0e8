//! Installer configuration.
//!
//! [`InstallerConfig`] is the raw record supplied by the embedding
//! application, either built in code or loaded from a TOML file. It is
//! turned into a [`ResolvedConfig`] exactly once, when the update engine is
//! constructed; see [`resolver`] for the normalization steps.
//!
//! # File Format
//!
//! ```toml
//! entry_point = "InstallMe"
//! install_base_path = "~/apps/install_me"
//! install_folder_template = "version_{version}"
//! current_version_uri = "https://example.com/InstallMe/version.txt"
//! update_location_template = "https://example.com/InstallMe/download/InstallMe_{version}.zip"
//!
//! # Optional
//! current_version = "1.2.0"          # defaults to the build's own version
//! settings_path = "~/apps/install_me/settings"
//! keep_version_count = 3             # prune older installs after each install
//! http_timeout_secs = 60
//! symlink_paths = ["~/.local/bin/install_me"]
//! windows_shortcut_paths = ["~/Desktop/InstallMe.lnk"]
//! ```

pub mod resolver;

use crate::core::InstallerError;
use crate::version::Version;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

pub use resolver::{ResolvedConfig, resolve};

/// Raw installer configuration as written by the application author.
///
/// Values are never mutated in place; each normalization step in
/// [`resolver`] returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// File name of the executable inside each install folder.
    ///
    /// The platform executable suffix (`.exe`) is added automatically when
    /// the archive only contains the suffixed file.
    pub entry_point: String,

    /// Directory holding every installed version. May start with `~`.
    pub install_base_path: String,

    /// Folder name for one version; must contain `{version}`.
    pub install_folder_template: String,

    /// URI of the version descriptor.
    pub current_version_uri: String,

    /// URI of the archive for a version; `{version}` is substituted.
    pub update_location_template: String,

    /// Version of the running application. Defaults to the build version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<Version>,

    /// Number of installed versions to keep. Unset or `0` keeps everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_version_count: Option<usize>,

    /// Directory for persisted installer state.
    ///
    /// Defaults to `<install_base_path>/settings`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<String>,

    /// Shortcut files (`.lnk`) to point at the new entry point. Windows only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub windows_shortcut_paths: Vec<String>,

    /// Symbolic links to point at the new entry point.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symlink_paths: Vec<String>,

    /// Timeout in seconds for each request to the update server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_timeout_secs: Option<u64>,
}

impl InstallerConfig {
    /// Create a configuration with the five required fields and no optional settings.
    pub fn new(
        entry_point: impl Into<String>,
        install_base_path: impl Into<String>,
        install_folder_template: impl Into<String>,
        current_version_uri: impl Into<String>,
        update_location_template: impl Into<String>,
    ) -> Self {
        Self {
            entry_point: entry_point.into(),
            install_base_path: install_base_path.into(),
            install_folder_template: install_folder_template.into(),
            current_version_uri: current_version_uri.into(),
            update_location_template: update_location_template.into(),
            current_version: None,
            keep_version_count: None,
            settings_path: None,
            windows_shortcut_paths: Vec::new(),
            symlink_paths: Vec::new(),
            http_timeout_secs: None,
        }
    }

    #[must_use]
    pub fn with_current_version(mut self, version: Version) -> Self {
        self.current_version = Some(version);
        self
    }

    #[must_use]
    pub fn with_settings_path(mut self, path: impl Into<String>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_keep_version_count(mut self, count: usize) -> Self {
        self.keep_version_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_symlink_paths(mut self, paths: Vec<String>) -> Self {
        self.symlink_paths = paths;
        self
    }

    #[must_use]
    pub fn with_windows_shortcut_paths(mut self, paths: Vec<String>) -> Self {
        self.windows_shortcut_paths = paths;
        self
    }

    #[must_use]
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = Some(secs);
        self
    }

    /// Load a configuration from a TOML file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read installer config from {}", path.display()))?;

        toml::from_str(&content)
            .map_err(InstallerError::from)
            .with_context(|| format!("Failed to parse installer config from {}", path.display()))
    }

    /// Load from `path` if given, otherwise from `installer.toml` in the
    /// current directory.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path =
            path.unwrap_or_else(|| PathBuf::from(crate::constants::DEFAULT_CONFIG_FILE));
        Self::load_from(&path).await
    }
}
