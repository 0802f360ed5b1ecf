//! View model for the upload control.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use super::ElementConfig;
use super::answer::UploadAnswer;

/// One required column with its selection field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnEntry {
    pub col_text: String,
    pub col_key: String,
}

/// Everything the template needs to draw one upload control.
///
/// The `*_json` fields are embedded in an inline `<script>` and are already
/// safe to place there verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    /// Name of the hidden payload field
    pub name: String,
    pub file_name: String,
    pub column_names: Vec<ColumnEntry>,
    pub column_names_json: String,
    /// Previously captured payload, `null` if there is none
    pub old_submission_json: String,
    /// Previous selections keyed by selection field name
    pub old_column_assignments_json: String,
    pub uuid: String,
    pub editable: bool,
}

/// Serialize for embedding inside `<script>`; `</` would end the script early.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize render data")?;
    Ok(json.replace("</", "<\\/"))
}

/// Build the view model for `config`, restoring a prior answer if present.
pub fn present(config: &ElementConfig, prior: Option<&UploadAnswer>, editable: bool) -> Result<RenderModel> {
    let keys = config.keys();

    let column_names: Vec<ColumnEntry> = keys
        .columns()
        .iter()
        .map(|key| ColumnEntry {
            col_text: key.column().to_string(),
            col_key: key.field_name(),
        })
        .collect();

    let old_submission = prior.and_then(|answer| answer.content.as_deref());
    let old_assignments: BTreeMap<String, &str> = prior
        .map(|answer| {
            answer
                .column_names
                .iter()
                .map(|(column, header)| (keys.column(column).field_name(), header.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let model = RenderModel {
        name: keys.file_field().to_string(),
        file_name: config.file_name().to_string(),
        column_names_json: script_json(config.column_names())?,
        old_submission_json: script_json(&old_submission)?,
        old_column_assignments_json: script_json(&old_assignments)?,
        column_names,
        uuid: uuid::Uuid::new_v4().to_string(),
        editable,
    };

    tracing::debug!(
        "Presenting '{}' with {} column(s), prior answer: {}",
        model.file_name,
        model.column_names.len(),
        prior.is_some()
    );
    Ok(model)
}
