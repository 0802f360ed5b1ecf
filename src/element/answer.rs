//! The stored answer of one widget instance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::SubmissionStore;

/// What `parse` leaves in the submission store under the file name.
///
/// `content` is the base-64 payload, `null` when the payload could not be
/// captured. `column_names` maps each required column to the header the
/// learner picked for it and may be incomplete when selections were missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAnswer {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub column_names: BTreeMap<String, String>,
}

/// State of the stored answer before a lifecycle call looks at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredAnswer {
    /// Nothing stored: the instance was never parsed
    Missing,
    /// The explicit `{}` marker: parsed, nothing was submitted
    Empty,
    /// A previous parse captured this
    Answer(UploadAnswer),
}

impl StoredAnswer {
    /// Read the stored value under `file_name`.
    ///
    /// A bare string is accepted as payload-only content; older pages stored
    /// the payload directly under the file name.
    #[must_use]
    pub fn load(store: &SubmissionStore, file_name: &str) -> Self {
        match store.get(file_name) {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::Object(map)) if map.is_empty() => Self::Empty,
            Some(Value::String(content)) => Self::Answer(UploadAnswer {
                content: Some(content.clone()),
                column_names: BTreeMap::new(),
            }),
            Some(value) => match serde_json::from_value::<UploadAnswer>(value.clone()) {
                Ok(answer) => Self::Answer(answer),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable stored answer for '{}': {}", file_name, e);
                    Self::Missing
                }
            },
        }
    }

    /// The answer, if one with content or selections was stored.
    #[must_use]
    pub fn answer(&self) -> Option<&UploadAnswer> {
        match self {
            Self::Answer(answer) => Some(answer),
            _ => None,
        }
    }
}
