//! Error handling for the installer
//!
//! This module provides the strongly-typed [`InstallerError`] used across the
//! crate and the user-facing [`ErrorContext`] wrapper that adds suggestions
//! for CLI users.
//!
//! # Error Categories
//!
//! - **Configuration**: [`InstallerError::InvalidBasePath`], [`InstallerError::MissingVersionToken`],
//!   [`InstallerError::ConfigError`], [`InstallerError::SettingsPathUnset`]
//! - **Usage**: [`InstallerError::NoAvailableVersion`]
//! - **Fetching**: [`InstallerError::NetworkError`], [`InstallerError::InvalidVersion`]
//! - **Installation**: [`InstallerError::ExtractionFailed`], [`InstallerError::FileSystemError`]
//!
//! Library functions return [`anyhow::Result`]; typed variants are converted with
//! `.into()` so callers can recover them with `downcast_ref::<InstallerError>()`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use just_installer::core::{InstallerError, user_friendly_error};
//!
//! let err: anyhow::Error = InstallerError::NoAvailableVersion.into();
//! let ctx = user_friendly_error(err);
//! ctx.display(); // colored error with a suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for installer operations
#[derive(Error, Debug)]
pub enum InstallerError {
    /// Generic configuration problem
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// The install base path is not absolute after `~` expansion
    #[error("Install base path must be absolute: {path}")]
    InvalidBasePath {
        /// The offending path as configured
        path: String,
    },

    /// The install folder template lacks the `{version}` placeholder
    #[error("Install folder template '{template}' does not contain the {{version}} placeholder")]
    MissingVersionToken {
        /// The template as configured
        template: String,
    },

    /// The first-run query was made without a settings directory
    #[error("Settings path is not configured")]
    SettingsPathUnset,

    /// A version string could not be parsed
    #[error("Invalid version '{input}'")]
    InvalidVersion {
        /// The text that failed to parse
        input: String,
    },

    /// `install_update` was called before any successful update check
    ///
    /// This is a programming error in the caller: run `check_for_update`
    /// first so the engine knows which version to install.
    #[error("No available version is known; check for updates before installing")]
    NoAvailableVersion,

    /// Fetching a remote resource failed
    #[error("Network error during {operation}: {reason}")]
    NetworkError {
        /// What was being fetched
        operation: String,
        /// Transport-level reason
        reason: String,
    },

    /// The downloaded archive could not be unpacked
    #[error("Failed to extract {archive} into {destination}: {reason}")]
    ExtractionFailed {
        /// Archive file
        archive: String,
        /// Target directory
        destination: String,
        /// Extractor-level reason
        reason: String,
    },

    /// General filesystem failure with the operation and path involved
    #[error("File system error: {operation} ({path})")]
    FileSystemError {
        /// The operation that failed (e.g. "rename install directory")
        operation: String,
        /// The path involved
        path: String,
    },

    /// The requested operation is not available on this platform
    #[error("Operation not supported on this platform: {operation}")]
    PlatformNotSupported {
        /// The operation that was attempted
        operation: String,
    },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Anything else
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for InstallerError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::InvalidBasePath {
                path,
            } => Self::InvalidBasePath {
                path: path.clone(),
            },
            Self::MissingVersionToken {
                template,
            } => Self::MissingVersionToken {
                template: template.clone(),
            },
            Self::SettingsPathUnset => Self::SettingsPathUnset,
            Self::InvalidVersion {
                input,
            } => Self::InvalidVersion {
                input: input.clone(),
            },
            Self::NoAvailableVersion => Self::NoAvailableVersion,
            Self::NetworkError {
                operation,
                reason,
            } => Self::NetworkError {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            Self::ExtractionFailed {
                archive,
                destination,
                reason,
            } => Self::ExtractionFailed {
                archive: archive.clone(),
                destination: destination.clone(),
                reason: reason.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::PlatformNotSupported {
                operation,
            } => Self::PlatformNotSupported {
                operation: operation.clone(),
            },
            // toml errors are not Clone; keep their message
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// An [`InstallerError`] with optional user-facing suggestion and details
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: InstallerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: InstallerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion, shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add explanatory details, shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with suggestions where the
/// failure is recognized.
///
/// Known [`InstallerError`] variants and common I/O error kinds get tailored
/// suggestions; anything else is reported with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(InstallerError::TomlError(toml_error)) = error.downcast_ref::<InstallerError>() {
        return ErrorContext::new(InstallerError::ConfigError {
            message: error.to_string(),
        })
        .with_details(toml_error.to_string())
        .with_suggestion("Check the TOML syntax of the installer configuration file");
    }

    if let Some(installer_error) = error.downcast_ref::<InstallerError>() {
        return create_error_context(installer_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(InstallerError::FileSystemError {
                    operation: "permission denied".to_string(),
                    path: error.to_string(),
                })
                .with_suggestion(
                    "Check ownership of the install base path or choose a directory you can write to",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(InstallerError::FileSystemError {
                    operation: "not found".to_string(),
                    path: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(InstallerError::Other {
        message,
    })
}

fn create_error_context(error: InstallerError) -> ErrorContext {
    match &error {
        InstallerError::InvalidBasePath {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use an absolute path or one starting with '~/' for install_base_path")
            .with_details("Relative install paths would depend on the working directory of the application"),
        InstallerError::MissingVersionToken {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Add {version} to install_folder_template, e.g. \"myapp_{version}\"")
            .with_details("Each version is installed side by side in its own folder"),
        InstallerError::NoAvailableVersion => ErrorContext::new(error)
            .with_suggestion("Call check_for_update before install_update"),
        InstallerError::SettingsPathUnset => ErrorContext::new(error)
            .with_suggestion("Set settings_path or leave it out to use <install_base_path>/settings"),
        InstallerError::NetworkError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check your network connection and the configured URIs, then retry")
                .with_details(details)
        }
        InstallerError::ExtractionFailed {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion(
                    "The previous install, if any, was kept in the '_backup' folder next to the destination",
                )
                .with_details(details)
        }
        _ => ErrorContext::new(error),
    }
}
