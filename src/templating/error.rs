//! Structured template errors.
//!
//! Tera reports failures as a chain of loosely formatted messages. Rendering
//! converts them into a [`TemplateError`] that knows the offending line and,
//! for undefined variables, which model fields exist.

use std::path::PathBuf;

/// Where in the template a failure happened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLocation {
    /// Template file, `None` for the built-in template
    pub template_path: Option<PathBuf>,
    /// Line number if Tera reported one
    pub line_number: Option<usize>,
    /// Lines around `line_number` as (1-indexed line, text)
    pub context_lines: Option<Vec<(usize, String)>>,
}

#[derive(Debug)]
pub enum TemplateError {
    VariableNotFound {
        variable: String,
        available_variables: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },

    /// The render model could not be turned into a Tera context
    InvalidModel {
        message: String,
    },
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::VariableNotFound {
                variable,
                ..
            } => {
                write!(f, "Template variable not found: '{}'", variable)
            }
            TemplateError::SyntaxError {
                message,
                ..
            } => {
                write!(f, "Template syntax error: {}", message)
            }
            TemplateError::InvalidModel {
                message,
            } => {
                write!(f, "Invalid render model: {}", message)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl TemplateError {
    /// Multi-line report with location and suggestions, for the CLI.
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::VariableNotFound {
                variable,
                available_variables,
                suggestions,
                location,
            } => format_variable_not_found_error(
                variable,
                available_variables,
                suggestions,
                location,
            ),
            TemplateError::SyntaxError {
                message,
                location,
            } => format_syntax_error(message, location),
            TemplateError::InvalidModel {
                message,
            } => format!("ERROR: Invalid Render Model\n\nError: {}\n", message),
        }
    }
}

fn format_template_name(location: &ErrorLocation) -> String {
    location
        .template_path
        .as_ref()
        .map_or_else(|| "built-in template".to_string(), |p| p.display().to_string())
}

fn push_context_lines(msg: &mut String, location: &ErrorLocation) {
    let Some(lines) = &location.context_lines else {
        return;
    };
    msg.push('\n');
    for (number, text) in lines {
        let marker = if Some(*number) == location.line_number {
            ">"
        } else {
            " "
        };
        msg.push_str(&format!("{} {:>4} | {}\n", marker, number, text));
    }
}

fn format_variable_not_found_error(
    variable: &str,
    available_variables: &[String],
    suggestions: &[String],
    location: &ErrorLocation,
) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Variable Not Found\n\n");
    msg.push_str(&format!("Variable: {}\n", variable));
    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }
    msg.push_str(&format!("Template: {}\n", format_template_name(location)));
    push_context_lines(&mut msg, location);
    msg.push('\n');

    if !suggestions.is_empty() {
        msg.push_str("Did you mean one of these?\n");
        for suggestion in suggestions {
            msg.push_str(&format!("  - {}\n", suggestion));
        }
        msg.push('\n');
    }

    if !available_variables.is_empty() {
        msg.push_str("Available variables:\n");
        for var in available_variables {
            msg.push_str(&format!("  {}\n", var));
        }
        msg.push('\n');
    }

    msg
}

fn format_syntax_error(message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Syntax Error\n\n");
    msg.push_str(&format!("Error: {}\n", message));
    msg.push_str(&format!("Template: {}\n", format_template_name(location)));
    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }
    push_context_lines(&mut msg, location);

    msg.push_str("\nSUGGESTION: Check template syntax for unclosed tags or invalid expressions.\n");
    msg.push_str("Common issues:\n");
    msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
    msg.push_str("  - Invalid filter names\n");
    msg.push_str("  - Missing quotes around string values\n\n");

    msg
}
