//! # sheetcrud
//!
//! Create, read, update and delete data in XLSX workbooks without
//! disturbing the rest of the document.
//!
//! The four operations live on [`SheetService`]; [`OpenXmlService`] is the
//! implementation backed by the OOXML package codec.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetcrud::prelude::*;
//! use std::path::Path;
//!
//! let service = OpenXmlService::new();
//! let path = Path::new("book.xlsx");
//!
//! service.create(path)?;
//! service.update_cell(path, "Sheet1", "A1", "hello")?;
//!
//! let table = service.read(path)?;
//! assert_eq!(table.cell(0, 0), Some("hello"));
//!
//! // Deleting a row that does not exist is not an error
//! assert!(!service.delete_row(path, "Sheet1", 42)?);
//! # Ok::<(), sheetcrud::Error>(())
//! ```

pub mod error;
pub mod options;
pub mod prelude;
pub mod service;
pub mod table;

pub use error::{Error, ErrorKind, Result};
pub use options::CodecOptions;
pub use service::{OpenXmlService, SheetService};
pub use table::Table;

// Re-export core types
pub use sheetcrud_core::{
    find_or_create_cell, resolve_cell_text, Cell, CellReference, CellValue, FirstRowRule,
    ReferenceRowRule, Row, RowIndexRule, SharedStringTable, SheetCatalog, SheetEntry, Worksheet,
    DEFAULT_SHEET_NAME,
};

// Re-export I/O types
pub use sheetcrud_xlsx::{Compression, SpreadsheetDocument, XlsxError};
