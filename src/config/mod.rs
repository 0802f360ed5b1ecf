//! Configuration for the element lifecycle.
//!
//! Settings come from an optional `csvmap.toml`. The file is looked up in this
//! order, first match wins:
//!
//! 1. the `--config` command-line flag;
//! 2. the `CSVMAP_CONFIG` environment variable;
//! 3. `csvmap.toml` in the working directory.
//!
//! An explicitly named file must exist. Without any file, defaults apply.
//!
//! ```toml
//! # Derive field names from the column list (default) or the declared file name
//! seed = "column-names"
//!
//! # Restyle the upload control; relative to this file
//! template = "templates/upload.html.tera"
//!
//! # Host error channel for submission defects
//! files_error_key = "_files"
//! ```

mod parser;

pub use parser::parse_config;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, FILES_ERROR_KEY};
use crate::core::CsvMapError;
use crate::keys::InstanceSeed;

/// Lifecycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// What the instance identifier is derived from
    pub seed: InstanceSeed,

    /// Override template for the upload control
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Format-error channel that receives submission defects
    pub files_error_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: InstanceSeed::default(),
            template: None,
            files_error_key: FILES_ERROR_KEY.to_string(),
        }
    }
}

/// Where settings will be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    /// Named explicitly, so a missing file is an error
    pub required: bool,
}

/// Pick the config file from the flag, the environment value and the working
/// directory. Pure so the lookup order can be tested without touching the
/// process environment.
#[must_use]
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    cwd: &Path,
) -> ConfigLocation {
    if let Some(path) = explicit {
        return ConfigLocation {
            path: path.to_path_buf(),
            required: true,
        };
    }
    match env_value.filter(|v| !v.is_empty()) {
        Some(value) => ConfigLocation {
            path: PathBuf::from(value),
            required: true,
        },
        None => ConfigLocation {
            path: cwd.join(CONFIG_FILE_NAME),
            required: false,
        },
    }
}

impl Settings {
    /// Load settings using the standard lookup order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let location = resolve_config_path(explicit, std::env::var_os(CONFIG_ENV_VAR), &cwd);
        Self::load_from_location(&location)
    }

    /// Load from a resolved location, falling back to defaults for an optional
    /// file that does not exist.
    pub fn load_from_location(location: &ConfigLocation) -> Result<Self> {
        if !location.required && !location.path.exists() {
            tracing::debug!("No {} found, using default settings", location.path.display());
            return Ok(Self::default());
        }
        Self::load_from(&location.path)
    }

    /// Load and validate one settings file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings: Self = parse_config(path)?;

        if let Some(template) = &settings.template {
            if template.is_relative() {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                settings.template = Some(base.join(template));
            }
        }

        settings.validate()?;
        tracing::debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Reject settings the lifecycle cannot work with.
    pub fn validate(&self) -> Result<(), CsvMapError> {
        if self.files_error_key.trim().is_empty() {
            return Err(CsvMapError::ConfigError {
                message: "files_error_key must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
