//! Error handling for csvmap
//!
//! Two kinds of failure exist in this crate and they travel on different paths:
//!
//! 1. **Configuration faults** ([`CsvMapError`]): the element markup, the
//!    question data or the configuration is wrong. These halt the lifecycle call
//!    for the offending element and are propagated with `anyhow::Result`.
//! 2. **Submission defects** ([`crate::element::ValidationError`]): the learner's
//!    upload is incomplete or inconsistent. These never abort anything; they are
//!    accumulated and reported back through the host's format-error channel.
//!
//! This module owns the first kind plus the CLI-facing presentation layer:
//! [`ErrorContext`] wraps an error with optional details and a suggestion, and
//! [`user_friendly_error`] turns any `anyhow::Error` into one.
//!
//! # Examples
//!
//! ```rust,no_run
//! use csvmap::core::{CsvMapError, ErrorContext};
//!
//! let context = ErrorContext::new(CsvMapError::MissingAttribute {
//!     element: "pl-single-csv-upload".to_string(),
//!     attribute: "column-names".to_string(),
//! })
//! .with_suggestion("Add column-names=\"a, b, c\" to the element");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for configuration faults.
///
/// Every variant describes an authoring or invocation mistake. None of them
/// describe a learner's submission; those are reported as validation defects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvMapError {
    /// The element fragment did not contain the expected tag
    #[error("Element <{element}> not found in markup")]
    ElementNotFound {
        /// Expected tag name
        element: String,
    },

    /// A required attribute is missing from the element
    #[error("Required attribute '{attribute}' missing from <{element}>")]
    MissingAttribute {
        /// Tag name of the element
        element: String,
        /// Name of the missing attribute
        attribute: String,
    },

    /// The element carries an attribute it does not understand
    #[error("Unknown attribute '{attribute}' on <{element}>")]
    UnknownAttribute {
        /// Tag name of the element
        element: String,
        /// The unrecognised attribute
        attribute: String,
        /// Closest known attribute, if one is near enough
        closest: Option<String>,
    },

    /// The comma-separated column list could not be parsed
    #[error("Invalid column list in attribute '{attribute}': {reason}")]
    InvalidColumnList {
        /// Attribute holding the list
        attribute: String,
        /// Why the list was rejected
        reason: String,
    },

    /// A submitted field name looked like a column key but did not decode
    #[error("Invalid column key: {field}")]
    InvalidColumnKey {
        /// The offending field name
        field: String,
    },

    /// The host question data could not be read
    #[error("Invalid question data: {reason}")]
    InvalidQuestionData {
        /// Why the data was rejected
        reason: String,
    },

    /// Template rendering failed
    #[error("Template rendering failed: {message}")]
    TemplateError {
        /// Cleaned-up message from the template engine
        message: String,
    },

    /// Configuration file problem
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// File system operation failed
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// The operation being attempted (e.g. "read element")
        operation: String,
        /// Path involved in the failure
        path: String,
    },

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error wrapper carrying user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CsvMapError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: CsvMapError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with actionable suggestions.
///
/// Recognises [`CsvMapError`], [`std::io::Error`], `toml` and `serde_json`
/// errors; everything else becomes [`CsvMapError::Other`] with the full cause
/// chain appended.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(csvmap_error) = error.downcast_ref::<CsvMapError>() {
        let mut ctx = create_error_context(csvmap_error.clone());
        // Errors wrapped with `.context()` keep the outer message as details.
        if error.chain().count() > 1 {
            ctx.details = Some(error.to_string());
        }
        return ctx;
    }

    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(CsvMapError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_details(error.to_string())
                .with_suggestion("Check that the file exists and the path is correct");
            }
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(CsvMapError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_details(error.to_string())
                .with_suggestion("Check the file permissions");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(CsvMapError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in csvmap.toml");
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(CsvMapError::InvalidQuestionData {
            reason: json_error.to_string(),
        })
        .with_suggestion("The question data must be a JSON object with params and submitted_answers");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(CsvMapError::Other {
        message,
    })
}

fn create_error_context(error: CsvMapError) -> ErrorContext {
    match &error {
        CsvMapError::ElementNotFound {
            element,
        } => {
            let hint = format!("The markup must contain a <{element} ...> opening tag");
            ErrorContext::new(error).with_suggestion(hint)
        }
        CsvMapError::MissingAttribute {
            attribute,
            ..
        } => {
            let hint = format!("Add the '{attribute}' attribute to the element");
            ErrorContext::new(error).with_suggestion(hint)
        }
        CsvMapError::UnknownAttribute {
            closest,
            ..
        } => {
            let hint = match closest {
                Some(name) => format!("Did you mean '{name}'?"),
                None => "Remove the attribute; supported attributes are column-names and file-name"
                    .to_string(),
            };
            ErrorContext::new(error).with_suggestion(hint)
        }
        CsvMapError::InvalidColumnList {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Separate names with commas and escape literal commas as \\,")
            .with_details("Quotes are not interpreted; a trailing backslash is not allowed"),
        CsvMapError::InvalidColumnKey {
            ..
        } => ErrorContext::new(error)
            .with_details("Column keys look like _single_csv_upload_<id>_col_<encoded name>"),
        CsvMapError::InvalidQuestionData {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass a JSON object with params and submitted_answers"),
        CsvMapError::TemplateError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the template syntax; variables use {{ var }}, control flow uses {% %}"),
        CsvMapError::ConfigError {
            ..
        } => ErrorContext::new(error).with_suggestion("Check csvmap.toml or the --config path"),
        CsvMapError::FileSystemError {
            ..
        } => ErrorContext::new(error).with_suggestion("Check that the path exists and is readable"),
        CsvMapError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
