//! Cell-related types
//!
//! This module contains:
//! - [`Cell`] - A `<c>` element: reference, value, preserved extras
//! - [`CellValue`] - The tagged value stored in a cell
//! - [`CellReference`] - A1-style reference decomposition

mod reference;
mod value;

pub use reference::CellReference;
pub use value::CellValue;

/// A single XML attribute kept verbatim (`name`, unescaped `value`)
pub type Attribute = (String, String);

/// A cell formula element (`<f>`), kept so untouched cells round-trip
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formula {
    /// Attributes such as `t="shared"`, `ref`, `si`
    pub attributes: Vec<Attribute>,
    /// Formula text
    pub text: String,
}

/// A cell within a row.
///
/// The `reference` string (e.g. `"A1"`) is the lookup key inside its row;
/// it is compared by string equality and never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Cell reference (`r` attribute)
    pub reference: String,
    /// Stored value; `None` when the cell has no `<v>`/`<is>` content
    pub value: Option<CellValue>,
    /// Formula element, if any
    pub formula: Option<Formula>,
    /// Attributes other than `r` and `t` (style index, metadata, ...)
    pub attributes: Vec<Attribute>,
    /// The `<c>` element exactly as it was read. While set, writers emit it
    /// verbatim instead of the fields above; [`Cell::set_text`] clears it.
    pub markup: Option<String>,
}

impl Cell {
    /// Create an empty cell with the given reference
    pub fn new<S: Into<String>>(reference: S) -> Self {
        Self {
            reference: reference.into(),
            ..Default::default()
        }
    }

    /// Create a cell with a value
    pub fn with_value<S: Into<String>>(reference: S, value: CellValue) -> Self {
        Self {
            reference: reference.into(),
            value: Some(value),
            ..Default::default()
        }
    }

    /// Replace the cell's content with a plain string.
    ///
    /// Any previous value and formula are discarded, whatever their type.
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.value = Some(CellValue::Text(text.into()));
        self.formula = None;
        self.markup = None;
    }

    /// Check if the cell has no stored value
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}
