//! Row types

use crate::cell::{Attribute, Cell};

/// A row of sheet data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Row index (1-based, the `r` attribute)
    pub index: u32,
    /// Cells in document order
    pub cells: Vec<Cell>,
    /// Attributes other than `r` (spans, height, style, ...)
    pub attributes: Vec<Attribute>,
}

impl Row {
    /// Create an empty row
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// First cell whose reference equals `reference`
    pub fn cell(&self, reference: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.reference == reference)
    }

    /// Mutable access to the first cell whose reference equals `reference`
    pub fn cell_mut(&mut self, reference: &str) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.reference == reference)
    }

    /// Number of cells in the row
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has any cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
