//! Common utilities for CLI commands

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::core::CsvMapError;
use crate::host::QuestionData;

/// Shared state every command runs with
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub settings: Settings,
}

impl CommandContext {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
        }
    }
}

/// Output format for commands that report rather than transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Element markup and question data inputs shared by the lifecycle commands.
#[derive(Args, Debug, Clone)]
pub struct ElementArgs {
    /// File containing the `<pl-single-csv-upload>` element markup
    #[arg(short, long, value_name = "FILE")]
    pub element: PathBuf,

    /// Question data JSON file; an empty request is used when omitted
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,
}

impl ElementArgs {
    pub async fn read_element(&self) -> Result<String> {
        read_element(&self.element).await
    }

    pub async fn read_data(&self) -> Result<QuestionData> {
        match &self.data {
            Some(path) => read_question_data(path).await,
            None => Ok(QuestionData::default()),
        }
    }
}

/// Read element markup from a file.
pub async fn read_element(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.with_context(|| CsvMapError::FileSystemError {
        operation: "read element markup".to_string(),
        path: path.display().to_string(),
    })
}

/// Read and deserialize question data JSON.
pub async fn read_question_data(path: &Path) -> Result<QuestionData> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read question data: {}", path.display()))?;
    let data: QuestionData = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse question data: {}", path.display()))?;
    tracing::debug!(
        "Loaded question data from {} ({} submitted field(s))",
        path.display(),
        data.submitted_answers.len()
    );
    Ok(data)
}

/// Pretty JSON for stdout.
pub fn to_json_output<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}
