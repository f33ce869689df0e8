//! `check` command: compare the running version with the published one.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use super::CliContext;
use crate::version::Version;

#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable result of a check.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub current_version: Option<Version>,
    pub available_version: Option<Version>,
    pub update_available: bool,
    pub errors: Vec<String>,
}

impl CheckCommand {
    pub async fn execute(self, context: &CliContext) -> Result<()> {
        let mut engine = context.engine().await?;

        let errors = Arc::new(Mutex::new(Vec::new()));
        let collected = Arc::clone(&errors);
        engine.on_error(move |message| {
            if let Ok(mut errors) = collected.lock() {
                errors.push(message.to_string());
            }
        });

        if !self.json && !context.quiet {
            println!("{}", "Checking for updates...".cyan());
        }
        let update_available = engine.check_for_update().await;

        let report = CheckReport {
            current_version: engine.current_version(),
            available_version: engine.available_version(),
            update_available,
            errors: errors.lock().map(|errors| errors.clone()).unwrap_or_default(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        let current = report
            .current_version
            .map_or_else(|| "unknown".to_string(), |version| version.to_string());

        match report.available_version {
            None => bail!("Failed to check for updates: {}", report.errors.join("; ")),
            Some(available) if update_available => {
                println!("{}", format!("Update available: {current} -> {available}").green());
                println!("Run `just-installer install` to install it");
            }
            Some(available) => {
                println!(
                    "{}",
                    format!("You are on the latest version ({current}, published {available})")
                        .green()
                );
            }
        }
        Ok(())
    }
}
