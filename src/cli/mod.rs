//! Command-line interface for just-installer.
//!
//! The CLI drives [`UpdateEngine`] from a TOML configuration file. It is
//! non-interactive so it can be called from scripts and launchers.
//!
//! # Commands
//!
//! - `check` - Report the running and the published version
//! - `install` - Install the published version if it is newer
//! - `first-run` - Report whether this is the first run of the configured version
//! - `restore` - Put the `_backup` folder of a version back in place
//!
//! # Global Options
//!
//! - `--config <PATH>` - Configuration file (also `JUST_INSTALLER_CONFIG`),
//!   defaults to `installer.toml` in the current directory
//! - `--verbose` - Enable debug logging
//! - `--quiet` - Only log errors and hide spinners
//!
//! `RUST_LOG` overrides the log level chosen by `--verbose` / `--quiet`.
//!
//! # Examples
//!
//! ```bash
//! just-installer --config app.toml check --json
//! just-installer install --run -- --open-welcome
//! just-installer first-run
//! ```

pub mod check;
pub mod first_run;
pub mod install;
pub mod restore;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::config::InstallerConfig;
use crate::constants::{CONFIG_PATH_ENV, NO_PROGRESS_ENV};
use crate::upgrade::UpdateEngine;

/// Main CLI structure for just-installer.
#[derive(Parser, Debug)]
#[command(
    name = "just-installer",
    about = "Side-by-side installer and self-updater for desktop applications",
    version,
    long_about = "Checks for a newer published version of an application, installs it next to the running one and keeps shortcuts and symlinks pointing at the newest install."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the installer configuration file.
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors and hide progress spinners.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a newer version is published.
    Check(check::CheckCommand),

    /// Download and install the published version.
    Install(install::InstallCommand),

    /// Report whether this is the first run of the configured version.
    FirstRun(first_run::FirstRunCommand),

    /// Restore the backup of an installed version.
    Restore(restore::RestoreCommand),
}

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config_path: Option<PathBuf>,
    pub quiet: bool,
}

impl CliContext {
    /// Load the configuration file and build an engine from it.
    pub async fn engine(&self) -> Result<UpdateEngine> {
        let config = InstallerConfig::load_with_optional(self.config_path.clone()).await?;
        UpdateEngine::new(config)
    }

    /// A spinner, hidden in quiet mode or when `JUST_INSTALLER_NO_PROGRESS` is set.
    pub fn spinner(&self, message: &str) -> Result<ProgressBar> {
        if self.quiet || std::env::var_os(NO_PROGRESS_ENV).is_some() {
            return Ok(ProgressBar::hidden());
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Ok(spinner)
    }
}

impl Cli {
    /// Set up logging and run the selected command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_filter());

        let context = CliContext {
            config_path: self.config,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Check(cmd) => cmd.execute(&context).await,
            Commands::Install(cmd) => cmd.execute(&context).await,
            Commands::FirstRun(cmd) => cmd.execute(&context).await,
            Commands::Restore(cmd) => cmd.execute(&context).await,
        }
    }

    /// Log filter for the verbosity flags, used when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "just_installer=debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
