//! Comma-separated token list parsing.
//!
//! Both the `column-names` attribute and the header row of an uploaded CSV file
//! are read with the same dialect:
//!
//! - delimiter `,`
//! - escape character `\` (the next character is taken literally, including
//!   `,`, `\` and a line break)
//! - no quoting: `"` and `'` are ordinary characters
//! - spaces at the start of a field are skipped
//! - only the first record is read; everything after the first unescaped line
//!   break (`\n` or `\r\n`) is ignored
//! - an unescaped `\r` followed by anything but `\n` is rejected
//!
//! # Examples
//!
//! ```rust
//! use csvmap::clist::parse_clist;
//!
//! let names = parse_clist(r"id, full\, name, score").unwrap();
//! assert_eq!(names, vec!["id", "full, name", "score"]);
//! ```

use thiserror::Error;

const DELIMITER: char = ',';
const ESCAPE: char = '\\';
const BOM: char = '\u{feff}';

/// Reasons a token list is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClistError {
    /// Nothing to parse
    #[error("no record found")]
    Empty,

    /// The input ended right after an escape character
    #[error("unexpected end of data after escape character")]
    UnterminatedEscape,

    /// A raw NUL character appeared in the record
    #[error("line contains NUL")]
    NulCharacter,

    /// A carriage return not followed by a line feed
    #[error("new-line character seen in unquoted field")]
    BareCarriageReturn,

    /// The bytes are not UTF-8
    #[error("content is not valid UTF-8")]
    InvalidUtf8,
}

/// Parse the first record of `raw` into its fields.
///
/// An empty first line yields an empty list; empty input is an error.
pub fn parse_clist(raw: &str) -> Result<Vec<String>, ClistError> {
    if raw.is_empty() {
        return Err(ClistError::Empty);
    }

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut at_field_start = true;
    let mut record_started = false;
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '\0' => return Err(ClistError::NulCharacter),
            ESCAPE => match chars.next() {
                Some('\0') => return Err(ClistError::NulCharacter),
                Some(escaped) => field.push(escaped),
                None => return Err(ClistError::UnterminatedEscape),
            },
            DELIMITER => fields.push(std::mem::take(&mut field)),
            '\n' => break,
            '\r' => match chars.clone().next() {
                None | Some('\n') => break,
                Some(_) => return Err(ClistError::BareCarriageReturn),
            },
            ' ' if at_field_start => {
                record_started = true;
                continue;
            }
            other => field.push(other),
        }
        record_started = true;
        at_field_start = c == DELIMITER;
    }

    if !record_started {
        return Ok(Vec::new());
    }

    fields.push(field);
    Ok(fields)
}

/// Join fields into a single record that [`parse_clist`] reads back unchanged.
///
/// A field starting with a space gets that space escaped so it survives the
/// leading-space skip.
#[must_use]
pub fn join_clist<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        for (j, c) in item.as_ref().chars().enumerate() {
            let needs_escape = matches!(c, DELIMITER | ESCAPE | '\n' | '\r') || (j == 0 && c == ' ');
            if needs_escape {
                out.push(ESCAPE);
            }
            out.push(c);
        }
    }
    out
}

/// Parse the header row of an uploaded CSV file.
///
/// The content must be UTF-8; a leading byte-order mark is dropped.
pub fn parse_header(content: &[u8]) -> Result<Vec<String>, ClistError> {
    let text = std::str::from_utf8(content).map_err(|_| ClistError::InvalidUtf8)?;
    let text = text.strip_prefix(BOM).unwrap_or(text);
    parse_clist(text)
}
