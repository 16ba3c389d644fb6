//! A1-style cell reference decomposition

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A cell reference split into its column letters and 1-based row number
/// (e.g. `"AB12"` -> `("AB", 12)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellReference {
    /// Column letters, upper-cased
    pub column: String,
    /// Row number (1-based)
    pub row: u32,
}

impl CellReference {
    /// Parse an A1-style reference.
    ///
    /// An optional `$` may precede either part. The column must be one or
    /// more ASCII letters followed by one or more ASCII digits, and the row
    /// must be at least 1.
    ///
    /// # Examples
    /// ```
    /// use sheetcrud_core::CellReference;
    ///
    /// let r = CellReference::parse("B12").unwrap();
    /// assert_eq!(r.column, "B");
    /// assert_eq!(r.row, 12);
    ///
    /// assert!(CellReference::parse("R1C1x").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidReference(s.to_string());

        let rest = s.strip_prefix('$').unwrap_or(s);
        let letters_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if letters_end == 0 {
            return Err(invalid());
        }
        let (column, rest) = rest.split_at(letters_end);

        let digits = rest.strip_prefix('$').unwrap_or(rest);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self {
            column: column.to_ascii_uppercase(),
            row,
        })
    }

    /// The column letters of a reference, without validating the rest
    /// (`"AB12"` -> `"AB"`, `"R1C1"` -> `"RC"`).
    pub fn column_name(reference: &str) -> String {
        reference.chars().filter(|c| c.is_alphabetic()).collect()
    }
}

impl FromStr for CellReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let r = CellReference::parse("A1").unwrap();
        assert_eq!(r.column, "A");
        assert_eq!(r.row, 1);
        assert_eq!(r.to_string(), "A1");
    }

    #[test]
    fn test_parse_absolute_and_lowercase() {
        let r: CellReference = "$xfd$1048576".parse().unwrap();
        assert_eq!(r.column, "XFD");
        assert_eq!(r.row, 1_048_576);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "12", "A", "A0", "R1C1", "A-1", "A1 ", "1A"] {
            assert_eq!(
                CellReference::parse(bad),
                Err(Error::InvalidReference(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_column_name() {
        assert_eq!(CellReference::column_name("AB12"), "AB");
        assert_eq!(CellReference::column_name("R1C1"), "RC");
        assert_eq!(CellReference::column_name("42"), "");
    }
}
