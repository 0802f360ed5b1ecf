//! The single-CSV-upload element and its three lifecycle calls.
//!
//! The host calls each element of a question page in three phases, passing the
//! element's markup and the request's [`QuestionData`]:
//!
//! - [`prepare`] registers the element's required column names with the
//!   page-wide [`PageRegistry`](crate::host::PageRegistry);
//! - [`render`] produces the upload control for the question panel;
//! - [`parse`] reconciles the submitted fields into an [`UploadAnswer`] and
//!   reports defects on the host's file error channel.
//!
//! Every phase re-derives the same [`ElementConfig`] from the markup, so field
//! names computed during `render` are the ones `parse` looks up on the next
//! request.
//!
//! # Example
//!
//! ```rust,no_run
//! use csvmap::config::Settings;
//! use csvmap::element;
//! use csvmap::host::QuestionData;
//!
//! # fn example() -> anyhow::Result<()> {
//! let html = r#"<pl-single-csv-upload column-names="id, score"></pl-single-csv-upload>"#;
//! let settings = Settings::default();
//! let mut data = QuestionData::default();
//!
//! element::prepare(html, &mut data, &settings)?;
//! let outcome = element::parse(html, &mut data, &settings)?;
//! for error in &outcome.errors {
//!     println!("{error}");
//! }
//! # Ok(())
//! # }
//! ```

mod answer;
pub mod attributes;
mod present;
mod reconcile;

pub use answer::{StoredAnswer, UploadAnswer};
pub use attributes::ElementAttributes;
pub use present::{ColumnEntry, RenderModel, present};
pub use reconcile::{ParseState, Reconciliation, ValidationError, reconcile};

use anyhow::{Context, Result};

use crate::clist::parse_clist;
use crate::config::Settings;
use crate::constants::{ATTR_COLUMN_NAMES, ATTR_FILE_NAME, DEFAULT_FILE_NAME_ID_LEN, ELEMENT_TAG};
use crate::core::CsvMapError;
use crate::host::{Panel, QuestionData};
use crate::keys::{ElementKeys, InstanceId, InstanceSeed};
use crate::templating::TemplateRenderer;

/// Everything derived from one element's declared attributes.
#[derive(Debug, Clone)]
pub struct ElementConfig {
    raw_column_names: String,
    column_names: Vec<String>,
    declared_file_name: Option<String>,
    file_name: String,
    seed: InstanceSeed,
    keys: ElementKeys,
}

impl ElementConfig {
    /// Validate attributes and derive the instance identity and keys.
    pub fn from_attributes(attrs: &ElementAttributes, seed: InstanceSeed) -> Result<Self, CsvMapError> {
        let (required, optional): (&[&str], &[&str]) = match seed {
            InstanceSeed::ColumnNames => (&[ATTR_COLUMN_NAMES], &[ATTR_FILE_NAME]),
            InstanceSeed::FileName => (&[ATTR_COLUMN_NAMES, ATTR_FILE_NAME], &[]),
        };
        attrs.check(required, optional)?;

        let raw_column_names = attrs.require(ATTR_COLUMN_NAMES)?.to_string();
        let column_names =
            parse_clist(&raw_column_names).map_err(|e| CsvMapError::InvalidColumnList {
                attribute: ATTR_COLUMN_NAMES.to_string(),
                reason: e.to_string(),
            })?;
        if column_names.is_empty() {
            return Err(CsvMapError::InvalidColumnList {
                attribute: ATTR_COLUMN_NAMES.to_string(),
                reason: "no column names declared".to_string(),
            });
        }

        let declared_file_name = match attrs.get(ATTR_FILE_NAME) {
            Some(name) if name.trim().is_empty() => {
                return Err(CsvMapError::MissingAttribute {
                    element: attrs.tag().to_string(),
                    attribute: ATTR_FILE_NAME.to_string(),
                });
            }
            other => other.map(str::to_string),
        };

        let instance = match (seed, declared_file_name.as_deref()) {
            (InstanceSeed::FileName, Some(file_name)) => InstanceId::from_seed(file_name),
            _ => InstanceId::from_seed(&raw_column_names),
        };
        let file_name = declared_file_name
            .clone()
            .unwrap_or_else(|| format!("upload-{}.csv", instance.short(DEFAULT_FILE_NAME_ID_LEN)));
        let keys = ElementKeys::new(instance, seed.encoding(), &column_names);

        Ok(Self {
            raw_column_names,
            column_names,
            declared_file_name,
            file_name,
            seed,
            keys,
        })
    }

    /// Parse the element markup and derive its configuration.
    pub fn from_html(element_html: &str, seed: InstanceSeed) -> Result<Self, CsvMapError> {
        let attrs = ElementAttributes::from_html(ELEMENT_TAG, element_html)?;
        Self::from_attributes(&attrs, seed)
    }

    /// The `column-names` attribute exactly as declared.
    #[must_use]
    pub fn raw_column_names(&self) -> &str {
        &self.raw_column_names
    }

    /// Required column names in declared order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn declared_file_name(&self) -> Option<&str> {
        self.declared_file_name.as_deref()
    }

    /// Key of the stored answer in the submission store.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn seed(&self) -> InstanceSeed {
        self.seed
    }

    #[must_use]
    pub fn keys(&self) -> &ElementKeys {
        &self.keys
    }
}

fn load(element_html: &str, settings: &Settings) -> Result<ElementConfig> {
    ElementConfig::from_html(element_html, settings.seed)
        .with_context(|| format!("Failed to read <{ELEMENT_TAG}> declaration"))
}

/// Register the element's required column names for the page.
pub fn prepare(element_html: &str, data: &mut QuestionData, settings: &Settings) -> Result<ElementConfig> {
    let config = load(element_html, settings)?;

    data.params.register(config.column_names());
    if let Some(file_name) = config.declared_file_name() {
        data.params.register_file_name(file_name);
    }

    tracing::debug!(
        "Registered {} required column(s) for instance {}",
        config.column_names().len(),
        config.keys().instance().short(12)
    );
    Ok(config)
}

/// Render the upload control. Outside the question panel this is empty.
pub fn render(
    element_html: &str,
    data: &QuestionData,
    settings: &Settings,
    renderer: &TemplateRenderer,
) -> Result<String> {
    if data.panel != Panel::Question {
        tracing::debug!("Skipping render for {:?} panel", data.panel);
        return Ok(String::new());
    }

    let config = load(element_html, settings)?;
    let prior = StoredAnswer::load(&data.submitted_answers, config.file_name());
    let model = present(&config, prior.answer(), data.editable)?;

    let html = renderer.render(&model).map_err(|e| CsvMapError::TemplateError {
        message: e.to_string(),
    })?;
    Ok(html)
}

/// Reconcile the submitted fields and report defects to the host.
///
/// Configuration faults are returned as errors. Submission defects are not:
/// they are appended to the configured error channel and also returned in the
/// [`Reconciliation`].
pub fn parse(element_html: &str, data: &mut QuestionData, settings: &Settings) -> Result<Reconciliation> {
    let config = load(element_html, settings)?;
    let outcome = reconcile(&config, &mut data.submitted_answers);

    for error in &outcome.errors {
        data.add_format_error(&settings.files_error_key, error.to_string());
    }

    Ok(outcome)
}
