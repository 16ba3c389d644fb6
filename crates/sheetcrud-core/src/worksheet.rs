//! Worksheet type

use crate::row::Row;

/// A worksheet's sheet data: its rows in document order.
///
/// Rows are keyed by their 1-based index but are not required to be sorted.
/// All lookups scan linearly and the first match in document order wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worksheet {
    rows: Vec<Row>,
}

impl Worksheet {
    /// Create a worksheet with no rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a worksheet from rows in document order
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Rows in document order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sheet data is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row with the given index
    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.iter().find(|r| r.index == index)
    }

    /// Position of the first row with the given index
    pub fn row_position(&self, index: u32) -> Option<usize> {
        self.rows.iter().position(|r| r.index == index)
    }

    /// Mutable rows in document order
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Append a row after every existing row and return its position
    pub fn push_row(&mut self, row: Row) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Remove the first row whose index equals `index`.
    ///
    /// Returns the removed row, or `None` if no row matched.
    pub fn remove_row(&mut self, index: u32) -> Option<Row> {
        let position = self.row_position(index)?;
        Some(self.rows.remove(position))
    }
}
