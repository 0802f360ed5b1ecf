//! Generic TOML parsing with file path context.

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into the specified type.
///
/// Errors carry the file path: "Failed to read config file: ..." for I/O
/// failures and "Failed to parse config file: ..." for TOML or schema
/// failures, with the underlying error preserved as the cause.
///
/// ```rust,no_run
/// use csvmap::config::{Settings, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let settings: Settings = parse_config(Path::new("csvmap.toml"))?;
/// println!("error channel: {}", settings.files_error_key);
/// # Ok(())
/// # }
/// ```
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
