//! Check a local CSV file against an element's required columns.
//!
//! Simulates a learner uploading `--csv` and selecting, for every required
//! column, the header with the same name. Authors use this to confirm a sample
//! file fits the element before publishing the question.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

use super::common::{CommandContext, OutputFormat, read_element, to_json_output};
use crate::core::CsvMapError;
use crate::element::{ElementConfig, ParseState, reconcile};
use crate::host::SubmissionStore;

/// Check that a CSV file has every required column
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// File containing the element markup
    #[arg(short, long, value_name = "FILE")]
    pub element: PathBuf,

    /// CSV file to check
    #[arg(long, value_name = "FILE")]
    pub csv: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub file_name: String,
    pub required_columns: Vec<String>,
    pub valid: bool,
    pub errors: Vec<String>,
}

impl CheckCommand {
    pub async fn report(&self, ctx: &CommandContext) -> Result<CheckReport> {
        let html = read_element(&self.element).await?;
        let config = ElementConfig::from_html(&html, ctx.settings.seed)?;
        let bytes = tokio::fs::read(&self.csv)
            .await
            .with_context(|| format!("Failed to read CSV file: {}", self.csv.display()))?;

        let keys = config.keys();
        let mut store = SubmissionStore::new();
        store.insert(keys.file_field(), json!(BASE64.encode(&bytes)));
        for key in keys.columns() {
            store.insert(key.field_name(), json!(key.column()));
        }

        let outcome = reconcile(&config, &mut store);
        Ok(CheckReport {
            file_name: config.file_name().to_string(),
            required_columns: config.column_names().to_vec(),
            valid: outcome.state == ParseState::Success,
            errors: outcome.errors.iter().map(ToString::to_string).collect(),
        })
    }

    pub async fn run(&self, ctx: &CommandContext) -> Result<(String, bool)> {
        let report = self.report(ctx).await?;
        if self.format == OutputFormat::Json {
            return Ok((to_json_output(&report)?, report.valid));
        }

        let output = if report.valid {
            format!(
                "{} {} has all {} required column(s)",
                "✓".green(),
                self.csv.display(),
                report.required_columns.len()
            )
        } else {
            report.errors.iter().map(|e| format!("{} {}", "✗".red(), e)).collect::<Vec<_>>().join("\n")
        };
        Ok((output, report.valid))
    }

    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let (output, valid) = self.run(ctx).await?;
        println!("{output}");
        if !valid {
            return Err(CsvMapError::Other {
                message: format!("{} does not fit the element", self.csv.display()),
            }
            .into());
        }
        Ok(())
    }
}
