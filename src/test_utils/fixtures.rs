//! Test fixtures for element markup and submissions
//!
//! Builders for the files the CLI reads (element markup, question data) and
//! for submitted field sets keyed the way the browser would key them.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

use crate::element::ElementConfig;
use crate::host::{QuestionData, SubmissionStore};
use crate::keys::InstanceSeed;

/// Base-64 payload of a CSV file, as the upload control submits it.
pub fn encode_csv(csv: &str) -> String {
    BASE64.encode(csv.as_bytes())
}

/// Test fixture for `<pl-single-csv-upload>` markup
#[derive(Clone, Debug)]
pub struct ElementFixture {
    pub content: String,
    pub name: String,
}

impl ElementFixture {
    /// Element with the given raw `column-names` attribute
    pub fn columns(column_names: &str) -> Self {
        Self {
            name: "columns".to_string(),
            content: format!(r#"<pl-single-csv-upload column-names="{column_names}"></pl-single-csv-upload>"#),
        }
    }

    /// Element declaring both a column list and a file name
    pub fn with_file_name(column_names: &str, file_name: &str) -> Self {
        Self {
            name: "with_file_name".to_string(),
            content: format!(
                r#"<pl-single-csv-upload column-names="{column_names}" file-name="{file_name}"></pl-single-csv-upload>"#
            ),
        }
    }

    /// Element with a misspelled attribute
    pub fn misspelled() -> Self {
        Self {
            name: "misspelled".to_string(),
            content: r#"<pl-single-csv-upload column-names="a" file-nme="a.csv"></pl-single-csv-upload>"#
                .to_string(),
        }
    }

    /// The derived configuration of this element.
    pub fn config(&self, seed: InstanceSeed) -> ElementConfig {
        ElementConfig::from_html(&self.content, seed)
            .unwrap_or_else(|e| panic!("fixture '{}' is not a valid element: {e}", self.name))
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.html", self.name));
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write element fixture to {}", path.display()))?;
        Ok(path)
    }
}

/// Builder for the submitted fields of one element
#[derive(Clone, Debug)]
pub struct SubmissionFixture {
    config: ElementConfig,
    payload: Option<Value>,
    selections: Vec<(String, String)>,
}

impl SubmissionFixture {
    pub fn new(config: ElementConfig) -> Self {
        Self {
            config,
            payload: None,
            selections: Vec::new(),
        }
    }

    /// Attach a CSV file as the base-64 payload.
    pub fn csv(mut self, csv: &str) -> Self {
        self.payload = Some(json!(encode_csv(csv)));
        self
    }

    /// Attach an arbitrary raw payload value.
    pub fn raw_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Select `header` for required column `column`.
    pub fn select(mut self, column: &str, header: &str) -> Self {
        self.selections.push((column.to_string(), header.to_string()));
        self
    }

    /// Select every required column's own name.
    pub fn select_identity(mut self) -> Self {
        for column in self.config.column_names().to_vec() {
            self.selections.push((column.clone(), column));
        }
        self
    }

    pub fn store(&self) -> SubmissionStore {
        let keys = self.config.keys();
        let mut store = SubmissionStore::new();
        if let Some(payload) = &self.payload {
            store.insert(keys.file_field(), payload.clone());
        }
        for (column, header) in &self.selections {
            store.insert(keys.column(column).field_name(), json!(header));
        }
        store
    }

    pub fn question_data(&self) -> QuestionData {
        QuestionData {
            submitted_answers: self.store(),
            ..QuestionData::default()
        }
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("data.json");
        let content = serde_json::to_string_pretty(&self.question_data())?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write question data fixture to {}", path.display()))?;
        Ok(path)
    }
}
