//! # sheetcrud-xlsx
//!
//! XLSX (Office Open XML) package codec for sheetcrud.
//!
//! The whole package is loaded into memory ([`Package`]), its workbook
//! structure is parsed into a [`SpreadsheetDocument`], edited worksheets are
//! re-serialized in place, and the package is written back as a whole.

pub mod document;
pub mod error;
pub mod package;
pub mod reader;
pub mod writer;

pub use document::SpreadsheetDocument;
pub use error::{XlsxError, XlsxResult};
pub use package::{Compression, Package, Part, WriteOptions};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
