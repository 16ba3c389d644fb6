//! Cell addressing and value resolution
//!
//! Pure logic, no I/O: locating or creating a row and cell by reference,
//! and decoding a cell's effective text.

use std::fmt;

use crate::cell::{Cell, CellReference};
use crate::error::Result;
use crate::row::Row;
use crate::shared_strings::SharedStringTable;
use crate::worksheet::Worksheet;

/// Strategy that derives the 1-based row index addressed by a cell reference
pub trait RowIndexRule: fmt::Debug + Send + Sync {
    /// Row index implied by `reference`
    fn row_index(&self, reference: &str) -> Result<u32>;
}

/// Always addresses row 1, whatever digits the reference carries.
///
/// This is the long-standing behavior of the update path: `"A5"` lands in
/// row 1 with its reference string kept as `"A5"`. Use [`ReferenceRowRule`]
/// to address the row the reference actually names.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstRowRule;

impl RowIndexRule for FirstRowRule {
    fn row_index(&self, _reference: &str) -> Result<u32> {
        Ok(1)
    }
}

/// Parses the row number out of an A1-style reference (`"B12"` -> 12)
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceRowRule;

impl RowIndexRule for ReferenceRowRule {
    fn row_index(&self, reference: &str) -> Result<u32> {
        CellReference::parse(reference).map(|r| r.row)
    }
}

/// Find the cell addressed by `reference`, creating its row and/or the cell
/// itself when missing.
///
/// The row index comes from `rule`. The first row with that index is used,
/// otherwise a new row is appended after all existing rows. Within the row
/// the first cell whose reference equals `reference` exactly is returned,
/// otherwise a new empty cell is appended to the row.
pub fn find_or_create_cell<'a>(
    worksheet: &'a mut Worksheet,
    reference: &str,
    rule: &dyn RowIndexRule,
) -> Result<&'a mut Cell> {
    let row_index = rule.row_index(reference)?;

    let position = match worksheet.row_position(row_index) {
        Some(position) => position,
        None => {
            log::trace!("appending row {row_index} for {reference}");
            worksheet.push_row(Row::new(row_index))
        }
    };
    let row = &mut worksheet.rows_mut()[position];

    let cell_position = match row.cells.iter().position(|c| c.reference == reference) {
        Some(found) => found,
        None => {
            log::trace!("appending cell {reference} to row {row_index}");
            row.cells.push(Cell::new(reference));
            row.cells.len() - 1
        }
    };
    Ok(&mut row.cells[cell_position])
}

/// The effective text of a cell.
///
/// A cell without a value yields an empty string. Shared-string cells are
/// dereferenced against `shared_strings`; an index past the end of the table
/// is an error. Everything else is returned as stored.
pub fn resolve_cell_text(shared_strings: &SharedStringTable, cell: &Cell) -> Result<String> {
    match &cell.value {
        None => Ok(String::new()),
        Some(value) => value.resolve(shared_strings),
    }
}
