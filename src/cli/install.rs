//! `install` command: download and install the published version.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use super::CliContext;

#[derive(Args, Debug)]
pub struct InstallCommand {
    /// Launch the new version once it is installed.
    #[arg(long)]
    pub run: bool,

    /// Install even when the published version is not newer.
    #[arg(long)]
    pub force: bool,

    /// Arguments passed to the launched application.
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl InstallCommand {
    pub async fn execute(self, context: &CliContext) -> Result<()> {
        let mut engine = context.engine().await?;
        let spinner = context.spinner("Checking for updates...")?;

        // Errors are already logged; the spinner only follows progress
        let progress = spinner.clone();
        engine.on_info(move |message| progress.set_message(message.to_string()));

        let newer = engine.check_for_update().await;
        let Some(available) = engine.available_version() else {
            spinner.finish_and_clear();
            bail!("No published version could be determined");
        };

        if !newer && !self.force {
            spinner.finish_and_clear();
            println!("{}", format!("Already on the latest version ({available})").green());
            return Ok(());
        }

        let installed = engine.install_update(self.run, &self.args).await;
        spinner.finish_and_clear();

        match installed? {
            Some(installed) => {
                println!("{}", format!("Installed version {}", installed.version).green());
                println!("Entry point: {}", installed.entry_point.display());
                Ok(())
            }
            None => bail!("Failed to download version {available}"),
        }
    }
}
