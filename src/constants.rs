//! Global constants used throughout the installer.
//!
//! File names, template tokens and timeouts that more than one module
//! depends on live here so the on-disk layout is defined in a single place.

use std::time::Duration;

/// Placeholder substituted with the version string in folder and URI templates.
pub const VERSION_TOKEN: &str = "{version}";

/// Suffix appended to an install directory when it is moved aside before extraction.
pub const BACKUP_SUFFIX: &str = "_backup";

/// Name of the settings directory created under the install base path when no
/// explicit settings path is configured.
pub const SETTINGS_DIR_NAME: &str = "settings";

/// File inside the settings directory holding the first-run marker.
pub const FIRST_RUN_MARKER_FILE: &str = "current_version.txt";

/// Environment variable the CLI reads the configuration file path from.
pub const CONFIG_PATH_ENV: &str = "JUST_INSTALLER_CONFIG";

/// Default file name of the installer configuration.
pub const DEFAULT_CONFIG_FILE: &str = "installer.toml";

/// Timeout for establishing a connection to the update server (30 seconds).
///
/// Applies to connection setup only; the configured `http_timeout_secs` bounds
/// whole requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = concat!("just-installer/", env!("CARGO_PKG_VERSION"));

/// Set to any value to disable progress spinners in the CLI.
pub const NO_PROGRESS_ENV: &str = "JUST_INSTALLER_NO_PROGRESS";
