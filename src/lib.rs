//! just-installer - side-by-side installer and self-updater
//!
//! An embeddable component for desktop applications that detects whether a
//! newer version is published, installs it next to the running version and
//! keeps shortcuts and symlinks pointing at the newest install.
//!
//! # Architecture Overview
//!
//! ```text
//! InstallerConfig ──resolve──► ResolvedConfig ──► UpdateEngine
//!                                                  ├── Transport         (fetch descriptor / archive)
//!                                                  ├── Extractor         (unpack archive)
//!                                                  └── LinkProvisioner   (shortcuts, symlinks)
//! ```
//!
//! # Core Modules
//!
//! - [`config`] - Raw configuration, TOML loading and the resolver pipeline
//! - [`upgrade`] - The update engine: check, install, links, first-run detection
//! - [`version`] - `major.minor[.revision]` versions and `{version}` templates
//! - [`core`] - Error types and user-facing error formatting
//!
//! ## Collaborators
//! - [`transport`] - HTTP and `file://` fetching
//! - [`archive`] - Zip extraction
//! - [`links`] - OS symlinks and Windows shortcuts
//!
//! ## Supporting Modules
//! - [`cli`] - The `just-installer` command line
//! - [`utils`] - File system and platform helpers
//! - [`constants`] - Shared names, tokens and timeouts
//!
//! # Example
//!
//! ```rust,no_run
//! use just_installer::config::InstallerConfig;
//! use just_installer::upgrade::UpdateEngine;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = InstallerConfig::load_from("installer.toml".as_ref()).await?;
//! let mut engine = UpdateEngine::new(config)?;
//!
//! if engine.is_first_run_on_current_version().await? {
//!     println!("Welcome to the new version!");
//! }
//!
//! if let Some(installed) = engine.install_update_if_available(true).await? {
//!     println!("Installed {} at {}", installed.version, installed.entry_point.display());
//! }
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod config;
pub mod constants;
pub mod core;
pub mod upgrade;
pub mod version;

// Collaborators
pub mod archive;
pub mod links;
pub mod transport;

// Supporting modules
pub mod cli;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
