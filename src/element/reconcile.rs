//! Submission reconciliation.
//!
//! Turns the raw fields posted by the upload form into an [`UploadAnswer`]:
//!
//! 1. take the file payload out of its internal field (or record that there
//!    was none);
//! 2. collect one header selection per required column, consuming the
//!    per-column fields;
//! 3. check the selections are distinct and exist in the uploaded header row.
//!
//! Defects never stop the pass early except where later checks would be
//! meaningless; every defect found is returned together so the learner sees
//! them all at once.

use std::collections::{BTreeMap, HashSet};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use thiserror::Error;

use super::ElementConfig;
use super::answer::{StoredAnswer, UploadAnswer};
use crate::clist::parse_header;
use crate::host::SubmissionStore;

/// A user-facing defect in one submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No submitted answer for single CSV upload.")]
    NoSubmission,

    #[error("No CSV column was selected for required column '{column}'.")]
    ColumnNotSelected { column: String },

    #[error("Some columns have duplicate names. Please ensure that each column has a unique name.")]
    DuplicateColumns,

    #[error("The following columns are missing from the uploaded CSV file: {}", .headers.join(", "))]
    MissingHeaders { headers: Vec<String> },

    #[error("Could not parse submitted file.")]
    UnparseableFile { reason: String },
}

/// Terminal state of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Answer stored, no defects
    Success,
    /// At least one defect; the stored answer is best-effort
    Failed,
    /// The payload field was already consumed by an earlier pass
    AlreadyProcessed,
}

/// Result of [`reconcile`]: the stored answer plus every defect found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub state: ParseState,
    /// `None` when nothing was submitted
    pub answer: Option<UploadAnswer>,
    pub errors: Vec<ValidationError>,
}

impl Reconciliation {
    fn finish(answer: Option<UploadAnswer>, errors: Vec<ValidationError>) -> Self {
        let state = if errors.is_empty() {
            ParseState::Success
        } else {
            ParseState::Failed
        };
        Self {
            state,
            answer,
            errors,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == ParseState::Success
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// The payload is a base-64 string, optionally wrapped as a JSON string literal.
fn unwrap_payload(raw: &Value) -> Result<String, ValidationError> {
    let text = match raw {
        Value::String(s) => s.trim(),
        other => {
            return Err(ValidationError::UnparseableFile {
                reason: format!("payload is a JSON {}", value_kind(other)),
            });
        }
    };

    if text.starts_with('"') {
        return serde_json::from_str::<String>(text).map_err(|e| ValidationError::UnparseableFile {
            reason: e.to_string(),
        });
    }
    Ok(text.to_string())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A selection field's value; `None` if nothing usable was posted.
fn selection_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Decode the payload and read its header row.
fn read_header(content: &str) -> Result<Vec<String>, ValidationError> {
    let cleaned: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64.decode(cleaned.as_bytes()).map_err(|e| ValidationError::UnparseableFile {
        reason: e.to_string(),
    })?;
    parse_header(&bytes).map_err(|e| ValidationError::UnparseableFile {
        reason: e.to_string(),
    })
}

/// Check the selected headers against the uploaded file's header row.
///
/// An unreadable file and a duplicate mapping are both reported; missing
/// headers are only looked for when neither applies.
fn check_headers(
    content: &str,
    column_names: &[String],
    assignments: &BTreeMap<String, String>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let header = match read_header(content) {
        Ok(fields) => Some(fields),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let distinct: HashSet<&str> = assignments.values().map(String::as_str).collect();
    if distinct.len() < assignments.len() {
        errors.push(ValidationError::DuplicateColumns);
    }

    let Some(header) = header else {
        return errors;
    };
    if !errors.is_empty() {
        return errors;
    }
    tracing::trace!("Uploaded header row: {:?}", header);

    let present: HashSet<&str> = header.iter().map(String::as_str).collect();
    let mut missing: Vec<String> = Vec::new();
    for column in column_names {
        if let Some(selected) = assignments.get(column) {
            if !present.contains(selected.as_str()) && !missing.contains(selected) {
                missing.push(selected.clone());
            }
        }
    }

    if missing.is_empty() {
        Vec::new()
    } else {
        vec![ValidationError::MissingHeaders {
            headers: missing,
        }]
    }
}

/// Reconcile one element's submitted fields in `store`.
///
/// Consumed internal fields are removed and the answer is written under the
/// element's file name. Running this again after the payload field is gone
/// either reports "no submission" again or, if an answer with content is
/// already stored, returns [`ParseState::AlreadyProcessed`] without touching
/// the store.
pub fn reconcile(config: &ElementConfig, store: &mut SubmissionStore) -> Reconciliation {
    let keys = config.keys();
    let file_name = config.file_name();

    let raw = store.remove(keys.file_field()).filter(|v| !is_blank(v));
    let Some(raw) = raw else {
        if let StoredAnswer::Answer(answer) = StoredAnswer::load(store, file_name) {
            if answer.content.is_some() {
                tracing::debug!("Answer for '{}' already reconciled", file_name);
                return Reconciliation {
                    state: ParseState::AlreadyProcessed,
                    answer: Some(answer),
                    errors: Vec::new(),
                };
            }
        }

        tracing::warn!("No file submitted for '{}'", file_name);
        store.insert(file_name, json!({}));
        return Reconciliation::finish(None, vec![ValidationError::NoSubmission]);
    };

    let mut errors = Vec::new();
    let content = match unwrap_payload(&raw) {
        Ok(content) => Some(content),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let mut assignments = BTreeMap::new();
    for key in keys.columns() {
        let column = key.column();
        if assignments.contains_key(column) {
            // Declared twice; the single field was consumed on the first visit.
            continue;
        }
        match store.remove(&key.field_name()).and_then(selection_text) {
            Some(selected) => {
                let selected = if selected.is_empty() {
                    column.to_string()
                } else {
                    selected
                };
                assignments.insert(column.to_string(), selected);
            }
            None => errors.push(ValidationError::ColumnNotSelected {
                column: column.to_string(),
            }),
        }
    }

    if let Some(content) = &content {
        errors.extend(check_headers(content, config.column_names(), &assignments));
    }

    for error in &errors {
        tracing::warn!("Submission defect for '{}': {}", file_name, error);
    }

    let answer = UploadAnswer {
        content,
        column_names: assignments,
    };
    match serde_json::to_value(&answer) {
        Ok(value) => {
            store.insert(file_name, value);
        }
        Err(e) => tracing::error!("Could not store answer for '{}': {}", file_name, e),
    }

    tracing::debug!(
        "Reconciled '{}': {} assignment(s), {} defect(s)",
        file_name,
        answer.column_names.len(),
        errors.len()
    );
    Reconciliation::finish(Some(answer), errors)
}
