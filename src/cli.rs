use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::cron_text::{CronError, format_cron, get_cron_text};

#[derive(Parser)]
#[command(name = "remindme")]
#[command(about = "Shortcut and schedule helpers for Remind Me Again")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses a separate dev config)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactively check key presses against the configured shortcuts (default)
    Keys,
    /// Print the configured shortcuts for this platform
    Shortcuts,
    /// Describe a cron expression in plain English
    Describe {
        /// Cron expression, e.g. "0 9 * * 1-5" (may be given unquoted)
        #[arg(required = true, num_args = 1..)]
        expression: Vec<String>,
        /// Fail with the parse error instead of printing "Invalid"
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Invalid cron expression: {0}")]
    CronError(#[from] CronError),
}

/// Handle the describe command
pub fn handle_describe(expression: &[String], strict: bool) -> Result<String, CliError> {
    let expression = expression.join(" ");
    if strict {
        Ok(format_cron(&expression)?)
    } else {
        Ok(get_cron_text(&expression))
    }
}

/// Handle the shortcuts command
pub fn handle_shortcuts(config: &Config) -> Result<Vec<String>, CliError> {
    let platform = config.platform();
    let lines = config
        .shortcuts
        .parse_all()?
        .into_iter()
        .map(|(action, shortcut)| format!("{:<16} {}", action, shortcut.display(platform)))
        .collect();
    Ok(lines)
}
