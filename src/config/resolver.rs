//! Normalization and validation of [`InstallerConfig`].
//!
//! [`resolve`] runs an ordered pipeline of small, independent steps:
//!
//! ```text
//! expand_user ─► ensure_version ─► ensure_defaults ─► validate
//! ```
//!
//! Every step takes a configuration by value and returns a new one, so each
//! can be tested in isolation. Only `validate` can fail, and its failure is
//! fatal: the update engine refuses to start with an invalid configuration.

use super::InstallerConfig;
use crate::constants::{SETTINGS_DIR_NAME, VERSION_TOKEN};
use crate::core::InstallerError;
use crate::utils::platform::expand_user as expand_home;
use crate::version::Version;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// A fully normalized configuration with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub entry_point: String,
    /// Absolute directory holding every installed version.
    pub install_base_path: PathBuf,
    pub install_folder_template: String,
    pub current_version_uri: String,
    pub update_location_template: String,
    /// `None` only when neither the config nor the build provides a version,
    /// which the engine treats as "nothing installed yet".
    pub current_version: Option<Version>,
    pub keep_version_count: Option<usize>,
    pub settings_path: PathBuf,
    pub windows_shortcut_paths: Vec<String>,
    pub symlink_paths: Vec<String>,
    pub http_timeout: Option<Duration>,
}

/// Normalize and validate a raw configuration.
///
/// # Errors
///
/// - [`InstallerError::InvalidBasePath`] when the base path is not absolute after `~` expansion
/// - [`InstallerError::MissingVersionToken`] when the folder template lacks `{version}`
pub fn resolve(config: InstallerConfig) -> Result<ResolvedConfig, InstallerError> {
    let config = expand_user(config);
    let config = ensure_version(config, Version::build_version());
    let config = ensure_defaults(config);
    validate(config)
}

/// Expand `~` in the base path and settings path.
#[must_use]
pub fn expand_user(config: InstallerConfig) -> InstallerConfig {
    let install_base_path = expand_home(&config.install_base_path).to_string_lossy().into_owned();
    let settings_path = config
        .settings_path
        .as_deref()
        .map(|path| expand_home(path).to_string_lossy().into_owned());

    InstallerConfig {
        install_base_path,
        settings_path,
        ..config
    }
}

/// Fill in `current_version` from `build_version` when unset.
#[must_use]
pub fn ensure_version(config: InstallerConfig, build_version: Option<Version>) -> InstallerConfig {
    if config.current_version.is_some() {
        return config;
    }
    debug!("No current version configured, using build version {:?}", build_version);
    InstallerConfig {
        current_version: build_version,
        ..config
    }
}

/// Derive `settings_path` from the base path when unset or empty.
#[must_use]
pub fn ensure_defaults(config: InstallerConfig) -> InstallerConfig {
    let needs_default = config.settings_path.as_deref().is_none_or(str::is_empty);
    if !needs_default {
        return config;
    }

    let settings_path = PathBuf::from(&config.install_base_path).join(SETTINGS_DIR_NAME);
    InstallerConfig {
        settings_path: Some(settings_path.to_string_lossy().into_owned()),
        ..config
    }
}

/// Check the structural invariants and produce the resolved form.
pub fn validate(config: InstallerConfig) -> Result<ResolvedConfig, InstallerError> {
    let install_base_path = PathBuf::from(&config.install_base_path);
    if !install_base_path.is_absolute() {
        return Err(InstallerError::InvalidBasePath {
            path: config.install_base_path,
        });
    }

    if !config.install_folder_template.contains(VERSION_TOKEN) {
        return Err(InstallerError::MissingVersionToken {
            template: config.install_folder_template,
        });
    }

    Ok(ResolvedConfig {
        entry_point: config.entry_point,
        install_base_path,
        install_folder_template: config.install_folder_template,
        current_version_uri: config.current_version_uri,
        update_location_template: config.update_location_template,
        current_version: config.current_version,
        keep_version_count: config.keep_version_count.filter(|count| *count > 0),
        settings_path: config.settings_path.map(PathBuf::from).unwrap_or_default(),
        windows_shortcut_paths: config.windows_shortcut_paths,
        symlink_paths: config.symlink_paths,
        http_timeout: config.http_timeout_secs.map(Duration::from_secs),
    })
}
