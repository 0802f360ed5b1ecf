//! Command-line interface for csvmap.
//!
//! The binary drives the element lifecycle from files so question authors and
//! host integrations can exercise it without a running page host:
//!
//! - `prepare` - register required columns, print updated question data
//! - `render` - print the upload control HTML
//! - `parse` - reconcile a submission, print updated question data
//! - `keys` - list or decode form-field names
//! - `check` - test a local CSV file against an element
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--config` - Settings file (see [`crate::config`])
//!
//! ```bash
//! csvmap --verbose parse --element question.html --data submitted.json
//! RUST_LOG=csvmap=trace csvmap render -e question.html
//! ```

pub mod check;
pub mod common;
pub mod keys;
pub mod parse;
pub mod prepare;
pub mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use common::CommandContext;

/// Runtime configuration derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can build one directly.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Filter directive for the log subscriber. `None` leaves `RUST_LOG` in
    /// charge and defaults to warnings.
    pub log_level: Option<String>,

    /// Explicit settings file from `--config`
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Filter for the log subscriber.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        }
    }

    /// Install the stderr log subscriber. A subscriber that is already set
    /// (tests, embedding) is left alone.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load settings honoring the explicit path.
    pub fn load_settings(&self) -> Result<Settings> {
        Settings::load(self.config_path.as_deref())
    }
}

/// Top-level command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "csvmap",
    about = "Single CSV upload with column mapping",
    version,
    long_about = "Runs the prepare, render and parse phases of the <pl-single-csv-upload> \
                  element against files, and checks CSV files against an element's required columns."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the settings file (default: $CSVMAP_CONFIG or ./csvmap.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register an element's required columns in the question data
    Prepare(prepare::PrepareCommand),

    /// Render the upload control HTML
    Render(render::RenderCommand),

    /// Reconcile a submission and print the updated question data
    Parse(parse::ParseCommand),

    /// List or decode the form-field names of an element
    Keys(keys::KeysCommand),

    /// Check that a CSV file has every required column
    Check(check::CheckCommand),
}

impl Cli {
    /// Execute the CLI command, building the configuration from the flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let ctx = CommandContext::new(config.load_settings()?);
        tracing::debug!("Running with settings: {:?}", ctx.settings);

        match self.command {
            Commands::Prepare(cmd) => cmd.execute(&ctx).await,
            Commands::Render(cmd) => cmd.execute(&ctx).await,
            Commands::Parse(cmd) => cmd.execute(&ctx).await,
            Commands::Keys(cmd) => cmd.execute(&ctx).await,
            Commands::Check(cmd) => cmd.execute(&ctx).await,
        }
    }
}
