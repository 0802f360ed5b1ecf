//! Declared attributes of the element markup.
//!
//! The host passes the element as an HTML fragment. Only the opening tag
//! matters here; its attributes are extracted, entity-decoded and checked
//! against the lists of required and optional names before anything else runs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use strsim::levenshtein;

use crate::core::CsvMapError;

/// Attribute names closer than this edit distance get a "did you mean" hint.
const SUGGESTION_MAX_DISTANCE: usize = 3;

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|amp|lt|gt|quot|apos|#39);")
        .expect("entity pattern is valid")
});

/// Attributes of one element occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementAttributes {
    tag: String,
    values: BTreeMap<String, String>,
}

impl ElementAttributes {
    /// Build from already-split name/value pairs. Names are lowercased.
    pub fn from_pairs<I, K, V>(tag: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs.into_iter().map(|(k, v)| (k.into().to_ascii_lowercase(), v.into())).collect();
        Self {
            tag: tag.to_string(),
            values,
        }
    }

    /// Read the attributes of the first `<tag ...>` in `fragment`.
    pub fn from_html(tag: &str, fragment: &str) -> Result<Self, CsvMapError> {
        let not_found = || CsvMapError::ElementNotFound {
            element: tag.to_string(),
        };

        let open = find_open_tag(tag, fragment).ok_or_else(not_found)?;
        let mut values = BTreeMap::new();
        for caps in ATTRIBUTE_RE.captures_iter(open) {
            let name = caps[1].to_ascii_lowercase();
            let raw = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4)).map_or("", |m| m.as_str());
            // HTML keeps the first occurrence of a repeated attribute.
            values.entry(name).or_insert_with(|| decode_entities(raw));
        }

        tracing::trace!("Parsed {} attribute(s) from <{}>", values.len(), tag);
        Ok(Self {
            tag: tag.to_string(),
            values,
        })
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value of a required attribute.
    pub fn require(&self, name: &str) -> Result<&str, CsvMapError> {
        self.get(name).ok_or_else(|| CsvMapError::MissingAttribute {
            element: self.tag.clone(),
            attribute: name.to_string(),
        })
    }

    /// Reject missing required attributes and any attribute not listed.
    pub fn check(&self, required: &[&str], optional: &[&str]) -> Result<(), CsvMapError> {
        for name in required {
            self.require(name)?;
        }

        for name in self.values.keys() {
            let known = required.iter().chain(optional).any(|k| k == name);
            if !known {
                let closest = required
                    .iter()
                    .chain(optional)
                    .map(|k| (*k, levenshtein(name, k)))
                    .filter(|(_, d)| *d <= SUGGESTION_MAX_DISTANCE)
                    .min_by_key(|(_, d)| *d)
                    .map(|(k, _)| k.to_string());
                return Err(CsvMapError::UnknownAttribute {
                    element: self.tag.clone(),
                    attribute: name.clone(),
                    closest,
                });
            }
        }

        Ok(())
    }
}

/// Slice of `fragment` between `<tag` and the closing `>` of the opening tag,
/// skipping `>` characters that sit inside quoted values.
fn find_open_tag<'a>(tag: &str, fragment: &'a str) -> Option<&'a str> {
    let lower = fragment.to_ascii_lowercase();
    let needle = format!("<{}", tag.to_ascii_lowercase());

    let mut search_from = 0;
    let start = loop {
        let pos = search_from + lower[search_from..].find(&needle)?;
        let after = pos + needle.len();
        // `<pl-single-csv-upload-extra` is a different element.
        match lower[after..].chars().next() {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => break after,
            None => break after,
            Some(_) => search_from = after,
        }
    };

    let mut quote: Option<char> = None;
    for (offset, c) in fragment[start..].char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => {
                let inner = &fragment[start..start + offset];
                return Some(inner.strip_suffix('/').unwrap_or(inner));
            }
            _ => {}
        }
    }
    None
}

/// Decode the character references authors commonly use in attribute values.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    ENTITY_RE
        .replace_all(raw, |caps: &Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
