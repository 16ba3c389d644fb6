//! Error types for sheetcrud-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetcrud-core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cell reference could not be decomposed into column letters and a row number
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    /// Shared-string cell points past the end of the shared-string table
    #[error("Shared string index {index} out of range (table has {len} entries)")]
    SharedStringOutOfRange { index: usize, len: usize },

    /// Sheet not found in the sheet catalog
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Two catalog entries share a numeric sheet id
    #[error("Duplicate sheet id {0} in sheet catalog")]
    DuplicateSheetId(u32),
}
