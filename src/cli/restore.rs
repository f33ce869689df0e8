//! `restore` command: manual recovery from an install's `_backup` folder.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::CliContext;
use crate::version::Version;

#[derive(Args, Debug)]
pub struct RestoreCommand {
    /// Version whose backup should be put back in place.
    #[arg(value_name = "VERSION")]
    pub version: Version,
}

impl RestoreCommand {
    pub async fn execute(self, context: &CliContext) -> Result<()> {
        let engine = context.engine().await?;

        if !context.quiet {
            println!("{}", format!("Restoring version {} from backup...", self.version).yellow());
        }
        engine
            .restore_backup(&self.version)
            .await
            .with_context(|| format!("Failed to restore version {}", self.version))?;

        println!("{}", format!("Restored {}", engine.install_dir(&self.version).display()).green());
        Ok(())
    }
}
