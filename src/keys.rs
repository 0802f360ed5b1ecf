//! Form-field key derivation.
//!
//! Every widget instance on a page owns a family of form fields. The family is
//! named after an [`InstanceId`], a SHA-256 digest of a stable attribute of the
//! element (its seed). The payload field is
//!
//! ```text
//! _single_csv_upload_<instance-id>
//! ```
//!
//! and each required column gets its own selector field
//!
//! ```text
//! _single_csv_upload_<instance-id>_col_<encoded column name>
//! ```
//!
//! Column names are encoded (uppercase hex or standard base-64, depending on the
//! seed variant) so that any character a column name may contain, including
//! `_`, stays out of the field-name syntax. The instance id has a fixed length
//! so the encoded part always starts at a known offset, which makes
//! [`ColumnKey::decode`] exact.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{COLUMN_SEPARATOR, FIELD_PREFIX};
use crate::core::CsvMapError;

/// Length of an instance id in hex digits.
pub const INSTANCE_ID_LEN: usize = 64;

/// Which declared attribute names the widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceSeed {
    /// The raw `column-names` attribute. Always present and stable across edits.
    #[default]
    ColumnNames,
    /// The `file-name` attribute. Authors must keep file names unique per page.
    FileName,
}

impl InstanceSeed {
    /// Column-name encoding paired with this seed on the wire.
    #[must_use]
    pub const fn encoding(self) -> KeyEncoding {
        match self {
            Self::ColumnNames => KeyEncoding::Base64,
            Self::FileName => KeyEncoding::Hex,
        }
    }
}

/// Reversible encoding of a column name inside a field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEncoding {
    /// Uppercase base-16
    Hex,
    /// Standard base-64 with padding
    Base64,
}

impl KeyEncoding {
    fn encode(self, column: &str) -> String {
        match self {
            Self::Hex => hex::encode_upper(column.as_bytes()),
            Self::Base64 => BASE64.encode(column.as_bytes()),
        }
    }

    fn decode(self, encoded: &str) -> Option<String> {
        let bytes = match self {
            // `hex::decode` accepts lowercase too; only our own output is canonical.
            Self::Hex if encoded.chars().any(|c| c.is_ascii_lowercase()) => return None,
            Self::Hex => hex::decode(encoded).ok()?,
            Self::Base64 => BASE64.decode(encoded).ok()?,
        };
        String::from_utf8(bytes).ok()
    }
}

/// Deterministic identifier of one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Hash a seed attribute value into an instance id.
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Accept an already-derived id (64 lowercase hex digits).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == INSTANCE_ID_LEN
            && raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading `len` hex digits, for display and default file names.
    #[must_use]
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }

    /// Name of the form field carrying the uploaded file.
    #[must_use]
    pub fn file_field(&self) -> String {
        format!("{FIELD_PREFIX}{}", self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the instance id for a seed value.
#[must_use]
pub fn instance_id(seed: &str) -> InstanceId {
    InstanceId::from_seed(seed)
}

/// Form-field key of one required column within one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    instance: InstanceId,
    column: String,
    encoding: KeyEncoding,
}

impl ColumnKey {
    #[must_use]
    pub fn new(instance: &InstanceId, column: &str, encoding: KeyEncoding) -> Self {
        Self {
            instance: instance.clone(),
            column: column.to_string(),
            encoding,
        }
    }

    #[must_use]
    pub fn instance(&self) -> &InstanceId {
        &self.instance
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn encoding(&self) -> KeyEncoding {
        self.encoding
    }

    /// The field name sent by the browser for this column's selector.
    #[must_use]
    pub fn field_name(&self) -> String {
        format!(
            "{FIELD_PREFIX}{}{COLUMN_SEPARATOR}{}",
            self.instance,
            self.encoding.encode(&self.column)
        )
    }

    /// Recover the instance and column from a field name.
    pub fn decode(field: &str, encoding: KeyEncoding) -> Result<Self, CsvMapError> {
        let invalid = || CsvMapError::InvalidColumnKey {
            field: field.to_string(),
        };

        let rest = field.strip_prefix(FIELD_PREFIX).ok_or_else(invalid)?;
        if rest.len() < INSTANCE_ID_LEN || !rest.is_char_boundary(INSTANCE_ID_LEN) {
            return Err(invalid());
        }
        let (id, tail) = rest.split_at(INSTANCE_ID_LEN);
        let instance = InstanceId::parse(id).ok_or_else(invalid)?;
        let encoded = tail.strip_prefix(COLUMN_SEPARATOR).ok_or_else(invalid)?;
        let column = encoding.decode(encoded).ok_or_else(invalid)?;

        Ok(Self {
            instance,
            column,
            encoding,
        })
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.field_name())
    }
}

/// Derive the key of `column` within `instance`.
#[must_use]
pub fn column_key(instance: &InstanceId, column: &str, encoding: KeyEncoding) -> ColumnKey {
    ColumnKey::new(instance, column, encoding)
}

/// Classification of a submitted field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldName {
    /// The file payload field of an instance
    File(InstanceId),
    /// A column selector field
    Column(ColumnKey),
}

impl FieldName {
    /// Classify `name`. Fields not owned by any widget instance give `Ok(None)`.
    pub fn parse(name: &str, encoding: KeyEncoding) -> Result<Option<Self>, CsvMapError> {
        let Some(rest) = name.strip_prefix(FIELD_PREFIX) else {
            return Ok(None);
        };
        if let Some(instance) = InstanceId::parse(rest) {
            return Ok(Some(Self::File(instance)));
        }
        if rest.len() > INSTANCE_ID_LEN
            && rest.is_char_boundary(INSTANCE_ID_LEN)
            && rest[INSTANCE_ID_LEN..].starts_with(COLUMN_SEPARATOR)
        {
            return ColumnKey::decode(name, encoding).map(|key| Some(Self::Column(key)));
        }
        Ok(None)
    }
}

/// All keys of one widget instance, derived once per request.
///
/// Render and parse both go through this table so the two sides can never
/// derive different names for the same column.
#[derive(Debug, Clone)]
pub struct ElementKeys {
    instance: InstanceId,
    encoding: KeyEncoding,
    file_field: String,
    columns: Vec<ColumnKey>,
}

impl ElementKeys {
    #[must_use]
    pub fn new(instance: InstanceId, encoding: KeyEncoding, columns: &[String]) -> Self {
        let columns = columns.iter().map(|c| ColumnKey::new(&instance, c, encoding)).collect();
        let file_field = instance.file_field();
        tracing::debug!("Derived keys for instance {} ({:?})", instance.short(12), encoding);
        Self {
            instance,
            encoding,
            file_field,
            columns,
        }
    }

    #[must_use]
    pub fn instance(&self) -> &InstanceId {
        &self.instance
    }

    #[must_use]
    pub fn encoding(&self) -> KeyEncoding {
        self.encoding
    }

    /// Name of the file payload field.
    #[must_use]
    pub fn file_field(&self) -> &str {
        &self.file_field
    }

    /// Column keys in declared order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Key of a required column. Names that were not declared get a key too,
    /// which is how prior assignments for renamed columns are re-keyed.
    #[must_use]
    pub fn column(&self, name: &str) -> ColumnKey {
        self.columns
            .iter()
            .find(|key| key.column() == name)
            .cloned()
            .unwrap_or_else(|| ColumnKey::new(&self.instance, name, self.encoding))
    }
}
