//! # sheetcrud-core
//!
//! Core data structures and pure addressing logic for sheetcrud.
//!
//! This crate provides the in-memory model of a worksheet package and the
//! rules that operate on it without touching any file:
//! - [`SheetCatalog`] - Sheet name -> sheet id -> worksheet part
//! - [`Worksheet`], [`Row`], [`Cell`] - Sheet data in document order
//! - [`CellValue`] - The tagged value of a cell
//! - [`SharedStringTable`] - The workbook's deduplicated text pool
//! - [`find_or_create_cell`] and [`resolve_cell_text`] - Addressing and decoding
//!
//! ## Example
//!
//! ```rust
//! use sheetcrud_core::{find_or_create_cell, resolve_cell_text, ReferenceRowRule};
//! use sheetcrud_core::{SharedStringTable, Worksheet};
//!
//! let mut sheet = Worksheet::new();
//! find_or_create_cell(&mut sheet, "B3", &ReferenceRowRule)
//!     .unwrap()
//!     .set_text("Hello");
//!
//! let cell = &sheet.row(3).unwrap().cells[0];
//! let text = resolve_cell_text(&SharedStringTable::new(), cell).unwrap();
//! assert_eq!(text, "Hello");
//! ```

pub mod addressing;
pub mod cell;
pub mod error;
pub mod row;
pub mod shared_strings;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use addressing::{
    find_or_create_cell, resolve_cell_text, FirstRowRule, ReferenceRowRule, RowIndexRule,
};
pub use cell::{Attribute, Cell, CellReference, CellValue, Formula};
pub use error::{Error, Result};
pub use row::Row;
pub use shared_strings::SharedStringTable;
pub use workbook::{SheetCatalog, SheetEntry};
pub use worksheet::Worksheet;

/// Name given to the single worksheet of a newly created workbook
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
