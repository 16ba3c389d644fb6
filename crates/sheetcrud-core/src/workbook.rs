//! Sheet catalog - the workbook-level index of worksheets

use crate::error::{Error, Result};

/// One `<sheet>` entry of the workbook's sheet catalog
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetEntry {
    /// Sheet name as shown on the tab
    pub name: String,
    /// Numeric sheet id (unique within the workbook)
    pub sheet_id: u32,
    /// Relationship id linking the entry to its worksheet part
    pub rel_id: String,
    /// Package path of the worksheet part (e.g. `xl/worksheets/sheet1.xml`)
    pub part: String,
}

/// Maps sheet name -> sheet id -> worksheet part, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetCatalog {
    entries: Vec<SheetEntry>,
}

impl SheetCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, rejecting a sheet id that is already registered
    pub fn push(&mut self, entry: SheetEntry) -> Result<()> {
        if self.entries.iter().any(|e| e.sheet_id == entry.sheet_id) {
            return Err(Error::DuplicateSheetId(entry.sheet_id));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// The first sheet in catalog order
    pub fn first(&self) -> Option<&SheetEntry> {
        self.entries.first()
    }

    /// Find a sheet by exact, case-sensitive name
    pub fn find(&self, name: &str) -> Result<&SheetEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Sheet names in catalog order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Iterate over the entries
    pub fn iter(&self) -> impl Iterator<Item = &SheetEntry> {
        self.entries.iter()
    }

    /// Number of sheets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no sheets
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<SheetEntry> for SheetCatalog {
    fn from(entry: SheetEntry) -> Self {
        Self {
            entries: vec![entry],
        }
    }
}
