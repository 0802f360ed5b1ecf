//! HTML rendering of the upload control.
//!
//! The control is drawn from a Tera template fed with the flat
//! [`RenderModel`](crate::element::RenderModel). A default template is compiled
//! into the crate; authors can point the `template` setting at their own file
//! to restyle the control. An override template sees the same variables:
//!
//! | Variable | Contents |
//! |----------|----------|
//! | `name` | name of the hidden payload input |
//! | `file_name` | file name the answer is stored under |
//! | `column_names` | list of `{col_text, col_key}` in declared order |
//! | `column_names_json` | required names as a JSON array |
//! | `old_submission_json` | previous payload as JSON, or `null` |
//! | `old_column_assignments_json` | previous selections keyed by `col_key` |
//! | `uuid` | per-render DOM id |
//! | `editable` | whether the learner may change the answer |
//!
//! Rendering uses one-off templates, so autoescaping is off: text placed in
//! HTML must go through the `escape` filter. The `*_json` variables are already
//! safe inside `<script>`.

pub mod error;
pub mod renderer;

pub use error::{ErrorLocation, TemplateError};
pub use renderer::TemplateRenderer;

/// The built-in upload control template.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/pl-single-csv-upload.html.tera");
