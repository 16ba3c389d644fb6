//! The four document operations
//!
//! Every operation loads the package into memory, works on the owned
//! document, and (when something changed) writes the whole package back.
//! File handles live only inside the load and save calls, so nothing stays
//! open once an operation returns, whether it succeeded or not.

use std::path::Path;

use sheetcrud_core::{find_or_create_cell, resolve_cell_text};
use sheetcrud_xlsx::SpreadsheetDocument;

use crate::error::{Error, Result};
use crate::options::CodecOptions;
use crate::table::Table;

/// Operations a front-end drives against a workbook file
pub trait SheetService {
    /// Create a new workbook at `path` holding one empty sheet, `Sheet1`.
    ///
    /// An existing file at `path` is overwritten if it is writable.
    fn create(&self, path: &Path) -> Result<()>;

    /// Read the first sheet (in catalog order) into a [`Table`]
    fn read(&self, path: &Path) -> Result<Table>;

    /// Set the cell at `reference` on `sheet_name` to the plain string
    /// `value`, creating the row and cell if needed
    fn update_cell(&self, path: &Path, sheet_name: &str, reference: &str, value: &str)
        -> Result<()>;

    /// Remove the row with index `row_index` from `sheet_name`.
    ///
    /// Returns `false`, without touching the file, when no row matches.
    fn delete_row(&self, path: &Path, sheet_name: &str, row_index: u32) -> Result<bool>;
}

/// [`SheetService`] backed by the OOXML package codec
#[derive(Debug, Clone, Default)]
pub struct OpenXmlService {
    options: CodecOptions,
}

impl OpenXmlService {
    /// Create a service with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service with the given options
    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    /// The options in use
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }
}

impl SheetService for OpenXmlService {
    fn create(&self, path: &Path) -> Result<()> {
        let mut document = SpreadsheetDocument::new();
        document.save(path, &self.options.write_options())?;
        log::debug!("created workbook {}", path.display());
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Table> {
        let document = SpreadsheetDocument::open(path)?;
        let entry = document
            .catalog()
            .first()
            .ok_or_else(|| Error::Format("workbook has no sheets".into()))?;
        let worksheet = document.worksheet(entry)?;

        let mut table = Table::new();
        for row in worksheet.rows() {
            let values = row
                .cells
                .iter()
                .map(|cell| resolve_cell_text(document.shared_strings(), cell))
                .collect::<sheetcrud_core::Result<Vec<_>>>()?;
            table.push_row(values);
        }

        log::debug!(
            "read {} rows x {} columns from sheet '{}'",
            table.row_count(),
            table.column_count(),
            entry.name
        );
        Ok(table)
    }

    fn update_cell(
        &self,
        path: &Path,
        sheet_name: &str,
        reference: &str,
        value: &str,
    ) -> Result<()> {
        let mut document = SpreadsheetDocument::open(path)?;
        let worksheet = document.worksheet_mut(sheet_name)?;
        find_or_create_cell(worksheet, reference, self.options.row_rule.as_ref())?.set_text(value);

        document.save(path, &self.options.write_options())?;
        log::debug!("updated {}!{} in {}", sheet_name, reference, path.display());
        Ok(())
    }

    fn delete_row(&self, path: &Path, sheet_name: &str, row_index: u32) -> Result<bool> {
        let mut document = SpreadsheetDocument::open(path)?;
        let worksheet = document.worksheet_mut(sheet_name)?;

        if worksheet.remove_row(row_index).is_none() {
            log::debug!("no row {} in sheet '{}', nothing to delete", row_index, sheet_name);
            return Ok(false);
        }

        document.save(path, &self.options.write_options())?;
        log::debug!("deleted row {} from sheet '{}'", row_index, sheet_name);
        Ok(true)
    }
}
