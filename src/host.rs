//! The host's per-request question data.
//!
//! The question page host hands every element the same JSON document on each
//! lifecycle call. Only the parts this crate touches are typed; everything else
//! is carried through untouched in `extra` maps so a round trip through
//! [`QuestionData`] never loses host fields.
//!
//! ```json
//! {
//!   "params": { "_required_column_names": ["a", "b"] },
//!   "submitted_answers": { "_single_csv_upload_<id>": "YSxi" },
//!   "format_errors": { "_files": ["..."] },
//!   "panel": "question",
//!   "editable": true
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display context of a lifecycle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    /// Interactive question panel; the only one with an upload control
    #[default]
    Question,
    /// Read-only review of a submission
    Submission,
    /// Answer key
    Answer,
}

/// Page-wide aggregate every element registers into during `prepare`.
///
/// Lives inside `params`, so it is scoped to one request and shared only by the
/// elements of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRegistry {
    #[serde(rename = "_required_column_names", default, skip_serializing_if = "Option::is_none")]
    required_column_names: Option<Vec<String>>,

    #[serde(
        rename = "_single_csv_upload_file_names",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    file_names: Option<Vec<String>>,

    /// Every other parameter of the question
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageRegistry {
    /// Append required column names. Re-registration on every pass is expected,
    /// so nothing is deduplicated here.
    pub fn register(&mut self, columns: &[String]) {
        self.required_column_names.get_or_insert_with(Vec::new).extend(columns.iter().cloned());
    }

    /// Record a declared file name for the page-level uniqueness check.
    pub fn register_file_name(&mut self, file_name: &str) {
        self.file_names.get_or_insert_with(Vec::new).push(file_name.to_string());
    }

    /// All registered column names, in registration order.
    #[must_use]
    pub fn required_column_names(&self) -> &[String] {
        self.required_column_names.as_deref().unwrap_or_default()
    }

    /// Declared file names registered more than once, sorted.
    #[must_use]
    pub fn duplicate_file_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for name in self.file_names.as_deref().unwrap_or_default() {
            if !seen.insert(name.as_str()) {
                duplicates.insert(name.clone());
            }
        }
        duplicates.into_iter().collect()
    }
}

/// The host's submitted-answer dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionStore(Map<String, Value>);

impl SubmissionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<Map<String, Value>> for SubmissionStore {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn default_editable() -> bool {
    true
}

/// Everything the host passes to a lifecycle call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionData {
    #[serde(default)]
    pub params: PageRegistry,

    #[serde(default)]
    pub submitted_answers: SubmissionStore,

    /// Host error channel: channel name to messages
    #[serde(default)]
    pub format_errors: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub panel: Panel,

    #[serde(default = "default_editable")]
    pub editable: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for QuestionData {
    fn default() -> Self {
        Self {
            params: PageRegistry::default(),
            submitted_answers: SubmissionStore::default(),
            format_errors: BTreeMap::new(),
            panel: Panel::default(),
            editable: default_editable(),
            extra: Map::new(),
        }
    }
}

impl QuestionData {
    /// Append a user-facing message to an error channel.
    pub fn add_format_error(&mut self, channel: &str, message: impl Into<String>) {
        self.format_errors.entry(channel.to_string()).or_default().push(message.into());
    }

    /// Messages reported on a channel so far.
    #[must_use]
    pub fn format_errors_for(&self, channel: &str) -> &[String] {
        self.format_errors.get(channel).map(Vec::as_slice).unwrap_or_default()
    }
}
