//! Cell value types

use std::fmt;

use crate::error::{Error, Result};
use crate::shared_strings::SharedStringTable;

/// The stored value of a cell, tagged by its data type.
///
/// Each variant corresponds to one value of the `t` attribute on a `<c>`
/// element. A shared-string cell stores only a position in the
/// [`SharedStringTable`]; every other variant carries its text directly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Plain string (`t="str"`)
    Text(String),

    /// Index into the shared-string table (`t="s"`)
    SharedString(usize),

    /// Rich inline string (`t="inlineStr"`), runs concatenated
    InlineString(String),

    /// Number (no `t` or `t="n"`), lexical form kept as stored
    Number(String),

    /// Boolean (`t="b"`)
    Boolean(bool),

    /// Error literal such as `#REF!` (`t="e"`)
    Error(String),

    /// ISO 8601 date (`t="d"`)
    Date(String),
}

impl CellValue {
    /// Create a plain string value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// The `t` attribute value for this variant, or `None` when the
    /// attribute is omitted (numbers).
    pub fn type_tag(&self) -> Option<&'static str> {
        match self {
            CellValue::Text(_) => Some("str"),
            CellValue::SharedString(_) => Some("s"),
            CellValue::InlineString(_) => Some("inlineStr"),
            CellValue::Number(_) => None,
            CellValue::Boolean(_) => Some("b"),
            CellValue::Error(_) => Some("e"),
            CellValue::Date(_) => Some("d"),
        }
    }

    /// Build a value from a `t` attribute and the raw text found in `<v>`
    /// (or the concatenated `<is>` runs for inline strings).
    ///
    /// Returns `None` for an unknown type tag or a shared-string / boolean
    /// payload that does not parse.
    pub fn from_raw(type_tag: Option<&str>, raw: String) -> Option<Self> {
        let value = match type_tag {
            None | Some("n") => CellValue::Number(raw),
            Some("str") => CellValue::Text(raw),
            Some("s") => CellValue::SharedString(raw.trim().parse().ok()?),
            Some("inlineStr") => CellValue::InlineString(raw),
            Some("b") => match raw.trim() {
                "1" | "true" => CellValue::Boolean(true),
                "0" | "false" => CellValue::Boolean(false),
                _ => return None,
            },
            Some("e") => CellValue::Error(raw),
            Some("d") => CellValue::Date(raw),
            Some(_) => return None,
        };
        Some(value)
    }

    /// The raw text exactly as it is stored in the document
    pub fn raw_text(&self) -> String {
        match self {
            CellValue::Text(s)
            | CellValue::InlineString(s)
            | CellValue::Number(s)
            | CellValue::Error(s)
            | CellValue::Date(s) => s.clone(),
            CellValue::SharedString(i) => i.to_string(),
            CellValue::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
        }
    }

    /// Check if the value is a shared-string reference
    pub fn is_shared_string(&self) -> bool {
        matches!(self, CellValue::SharedString(_))
    }

    /// Resolve the effective display text of this value.
    ///
    /// Shared-string references are dereferenced against `shared_strings`;
    /// every other variant yields its raw text unchanged.
    pub fn resolve(&self, shared_strings: &SharedStringTable) -> Result<String> {
        match self {
            CellValue::SharedString(index) => shared_strings
                .get(*index)
                .map(str::to_string)
                .ok_or(Error::SharedStringOutOfRange {
                    index: *index,
                    len: shared_strings.len(),
                }),
            other => Ok(other.raw_text()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::SharedString(i) => write!(f, "#sst[{}]", i),
            other => f.write_str(&other.raw_text()),
        }
    }
}
