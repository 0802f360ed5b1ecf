//! Inspect the form-field names of an element.
//!
//! Authors debugging a submission can list the fields an element expects, or
//! decode a field name found in submitted data back to its column.
//!
//! ```bash
//! csvmap keys --element question.html
//! csvmap keys --decode _single_csv_upload_<id>_col_aWQ= --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::common::{CommandContext, OutputFormat, read_element, to_json_output};
use crate::core::CsvMapError;
use crate::element::ElementConfig;
use crate::keys::{FieldName, InstanceSeed};

/// List or decode the form-field names of an element
#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["element", "decode"])))]
pub struct KeysCommand {
    /// File containing the element markup
    #[arg(short, long, value_name = "FILE")]
    pub element: Option<std::path::PathBuf>,

    /// Decode one submitted field name
    #[arg(long, value_name = "FIELD")]
    pub decode: Option<String>,

    /// Seed override; defaults to the configured seed
    #[arg(long, value_enum)]
    pub seed: Option<InstanceSeed>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ColumnRow {
    column: String,
    field: String,
}

#[derive(Debug, Serialize)]
struct KeyTable {
    instance: String,
    file_name: String,
    file_field: String,
    columns: Vec<ColumnRow>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum DecodedField {
    File { instance: String },
    Column { instance: String, column: String },
}

impl KeysCommand {
    pub async fn run(&self, ctx: &CommandContext) -> Result<String> {
        let seed = self.seed.unwrap_or(ctx.settings.seed);
        match (&self.element, &self.decode) {
            (_, Some(field)) => self.decode_field(field, seed),
            (Some(path), None) => {
                let html = read_element(path).await?;
                let config = ElementConfig::from_html(&html, seed)?;
                self.list(&config)
            }
            (None, None) => Err(CsvMapError::Other {
                message: "Either --element or --decode is required".to_string(),
            }
            .into()),
        }
    }

    fn list(&self, config: &ElementConfig) -> Result<String> {
        let keys = config.keys();
        let table = KeyTable {
            instance: keys.instance().to_string(),
            file_name: config.file_name().to_string(),
            file_field: keys.file_field().to_string(),
            columns: keys
                .columns()
                .iter()
                .map(|key| ColumnRow {
                    column: key.column().to_string(),
                    field: key.field_name(),
                })
                .collect(),
        };

        if self.format == OutputFormat::Json {
            return to_json_output(&table);
        }

        let mut out = String::new();
        out.push_str(&format!("{} {}\n", "Instance:".bold(), table.instance));
        out.push_str(&format!("{} {}\n", "File name:".bold(), table.file_name));
        out.push_str(&format!("{} {}\n", "File field:".bold(), table.file_field.cyan()));
        out.push_str(&format!("{}\n", "Columns:".bold()));
        for row in &table.columns {
            out.push_str(&format!("  {} → {}\n", row.column, row.field.cyan()));
        }
        Ok(out.trim_end().to_string())
    }

    fn decode_field(&self, field: &str, seed: InstanceSeed) -> Result<String> {
        let decoded = match FieldName::parse(field, seed.encoding())? {
            Some(FieldName::File(instance)) => DecodedField::File {
                instance: instance.to_string(),
            },
            Some(FieldName::Column(key)) => DecodedField::Column {
                instance: key.instance().to_string(),
                column: key.column().to_string(),
            },
            None => {
                return Err(CsvMapError::InvalidColumnKey {
                    field: field.to_string(),
                }
                .into());
            }
        };

        if self.format == OutputFormat::Json {
            return to_json_output(&decoded);
        }
        Ok(match decoded {
            DecodedField::File {
                instance,
            } => format!("{} file payload of instance {}", "✓".green(), instance),
            DecodedField::Column {
                instance,
                column,
            } => format!("{} column '{}' of instance {}", "✓".green(), column, instance),
        })
    }

    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        println!("{}", self.run(ctx).await?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{InstanceId, KeyEncoding, column_key};

    fn decode(field: &str, seed: Option<InstanceSeed>) -> KeysCommand {
        KeysCommand {
            element: None,
            decode: Some(field.to_string()),
            seed,
            format: OutputFormat::Json,
        }
    }

    #[tokio::test]
    async fn test_decode_column_field() {
        let instance = InstanceId::from_seed("a,b");
        let field = column_key(&instance, "b", KeyEncoding::Base64).field_name();

        let out = decode(&field, None).run(&CommandContext::default()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["kind"], "column");
        assert_eq!(value["column"], "b");
        assert_eq!(value["instance"], instance.as_str());
    }

    #[tokio::test]
    async fn test_decode_with_seed_override() {
        let instance = InstanceId::from_seed("data.csv");
        let field = column_key(&instance, "score", KeyEncoding::Hex).field_name();

        let out = decode(&field, Some(InstanceSeed::FileName)).run(&CommandContext::default()).await.unwrap();
        assert!(out.contains("\"score\""));
    }

    #[tokio::test]
    async fn test_decode_file_and_foreign_fields() {
        let instance = InstanceId::from_seed("x");
        let out = decode(&instance.file_field(), None).run(&CommandContext::default()).await.unwrap();
        assert!(out.contains("\"file\""));

        let err = decode("unrelated", None).run(&CommandContext::default()).await.unwrap_err();
        let ctx = crate::core::user_friendly_error(err);
        assert!(matches!(ctx.error, CsvMapError::InvalidColumnKey { .. }));
    }

    #[tokio::test]
    async fn test_list_element_keys() {
        let temp = tempfile::tempdir().unwrap();
        let element = temp.path().join("q.html");
        tokio::fs::write(&element, r#"<pl-single-csv-upload column-names="id, name">"#).await.unwrap();

        let cmd = KeysCommand {
            element: Some(element),
            decode: None,
            seed: None,
            format: OutputFormat::Json,
        };
        let out = cmd.run(&CommandContext::default()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let instance = InstanceId::from_seed("id, name");
        assert_eq!(value["file_field"], instance.file_field());
        assert_eq!(value["columns"][1]["column"], "name");
        assert_eq!(
            value["columns"][1]["field"],
            column_key(&instance, "name", KeyEncoding::Base64).field_name()
        );
    }
}
