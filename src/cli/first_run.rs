//! `first-run` command.

use anyhow::Result;
use clap::Args;

use super::CliContext;

#[derive(Args, Debug)]
pub struct FirstRunCommand {
    /// Exit with status 2 instead of printing when this is not the first run.
    #[arg(long)]
    pub exit_code: bool,
}

impl FirstRunCommand {
    pub async fn execute(self, context: &CliContext) -> Result<()> {
        let engine = context.engine().await?;
        let first_run = engine.is_first_run_on_current_version().await?;

        if self.exit_code {
            if !first_run {
                std::process::exit(2);
            }
            return Ok(());
        }

        println!("{first_run}");
        Ok(())
    }
}
