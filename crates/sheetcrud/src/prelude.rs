//! Prelude module - common imports for sheetcrud users
//!
//! ```rust
//! use sheetcrud::prelude::*;
//! ```

pub use crate::{
    CellValue, CodecOptions, Compression, Error, ErrorKind, OpenXmlService, Result,
    SheetService, Table,
};
