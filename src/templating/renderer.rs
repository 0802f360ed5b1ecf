//! Template rendering engine with Tera.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::DEFAULT_TEMPLATE;
use super::error::{ErrorLocation, TemplateError};
use crate::config::Settings;
use crate::element::RenderModel;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Lines shown on each side of a failing template line.
const CONTEXT_SIZE: usize = 3;

static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Variable|Unknown variable) `([^`]+)`").expect("variable pattern is valid")
});

static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-->\s*(\d+):(\d+)").expect("line pattern is valid"));

/// Renders the upload control from a [`RenderModel`].
///
/// Holds the template source; a fresh Tera instance is created per render so
/// the renderer can be shared freely.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    source: String,
    template_path: Option<PathBuf>,
}

impl TemplateRenderer {
    /// Renderer using the template compiled into the crate.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
            template_path: None,
        }
    }

    /// Renderer for an in-memory template. `path` is only used in error reports.
    #[must_use]
    pub fn from_source(source: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            source: source.into(),
            template_path: path,
        }
    }

    /// Load a template file.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let source = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read template file: {}", path.display()))?;
        tracing::debug!("Loaded template from {}", path.display());
        Ok(Self::from_source(source, Some(path.to_path_buf())))
    }

    /// The configured override template, or the built-in one.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        match &settings.template {
            Some(path) => Self::from_file(path).await,
            None => Ok(Self::builtin()),
        }
    }

    #[must_use]
    pub fn template_path(&self) -> Option<&Path> {
        self.template_path.as_deref()
    }

    /// Render the upload control. Surrounding whitespace is trimmed.
    pub fn render(&self, model: &RenderModel) -> Result<String, TemplateError> {
        self.render_value(model)
    }

    /// Render any serializable model with this template.
    pub fn render_value<T: Serialize>(&self, model: &T) -> Result<String, TemplateError> {
        let context = TeraContext::from_serialize(model).map_err(|e| TemplateError::InvalidModel {
            message: Self::format_tera_error(&e),
        })?;
        tracing::trace!("Rendering with variables: {:?}", Self::extract_available_variables(&context));

        let mut tera = Tera::default();
        let rendered = tera
            .render_str(&self.source, &context)
            .map_err(|e| self.parse_tera_error(&e, &context))?;

        tracing::debug!("Template rendering complete ({} bytes)", rendered.len());
        Ok(rendered.trim().to_string())
    }

    /// Parse a Tera error into a structured TemplateError
    fn parse_tera_error(&self, error: &tera::Error, context: &TeraContext) -> TemplateError {
        let messages = Self::error_chain(error);
        let line_number = messages.iter().find_map(|msg| {
            LINE_RE.captures(msg).and_then(|caps| caps[1].parse::<usize>().ok())
        });
        let context_lines = line_number
            .map(|line| Self::extract_context_lines(&self.source, line, CONTEXT_SIZE))
            .filter(|lines| !lines.is_empty());
        let location = Box::new(ErrorLocation {
            template_path: self.template_path.clone(),
            line_number,
            context_lines,
        });

        let variable = messages
            .iter()
            .find_map(|msg| VARIABLE_RE.captures(msg).map(|caps| caps[1].to_string()));
        match variable {
            Some(variable) => {
                let available_variables = Self::extract_available_variables(context);
                let suggestions = Self::find_similar_variables(&variable, &available_variables);
                TemplateError::VariableNotFound {
                    variable,
                    available_variables: Box::new(available_variables),
                    suggestions: Box::new(suggestions),
                    location,
                }
            }
            None => TemplateError::SyntaxError {
                message: Self::format_tera_error(error),
                location,
            },
        }
    }

    fn error_chain(error: &tera::Error) -> Vec<String> {
        use std::error::Error;

        let mut all_messages = vec![error.to_string()];
        let mut current_error: Option<&dyn Error> = error.source();
        while let Some(err) = current_error {
            all_messages.push(err.to_string());
            current_error = err.source();
        }
        all_messages
    }

    /// Top-level model fields, sorted
    fn extract_available_variables(context: &TeraContext) -> Vec<String> {
        match context.clone().into_json() {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> =
            available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();
        scored.sort_by_key(|(_, dist)| *dist);

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Lines around `error_line` (1-indexed) with their line numbers.
    fn extract_context_lines(
        content: &str,
        error_line: usize,
        context_size: usize,
    ) -> Vec<(usize, String)> {
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        if error_line == 0 || error_line > total_lines {
            return Vec::new();
        }

        let start = error_line.saturating_sub(context_size + 1);
        let end = (error_line + context_size).min(total_lines);

        lines[start..end]
            .iter()
            .enumerate()
            .map(|(idx, line)| (start + idx + 1, line.to_string()))
            .collect()
    }

    /// Flatten a Tera error chain into one readable message.
    ///
    /// Tera names one-off templates `__tera_one_off`; that name is stripped
    /// from every message since it means nothing to the author.
    pub fn format_tera_error(error: &tera::Error) -> String {
        let messages: Vec<String> = Self::error_chain(error)
            .into_iter()
            .map(|msg| {
                msg.replace("while rendering '__tera_one_off'", "")
                    .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                    .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                    .replace("'__tera_one_off'", "template")
                    .trim()
                    .to_string()
            })
            .filter(|cleaned| {
                !cleaned.is_empty()
                    && cleaned != "Template rendering failed"
                    && cleaned != "Template syntax error"
            })
            .collect();

        if messages.is_empty() {
            "Template syntax error (see details above)".to_string()
        } else {
            messages.join("\n  → ")
        }
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::builtin()
    }
}
