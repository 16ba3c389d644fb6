//! Error taxonomy for the document operations

use sheetcrud_xlsx::XlsxError;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File missing, unreadable, unwritable or locked
    Io,
    /// Package structurally invalid or inconsistent
    Format,
    /// A caller-supplied argument names something that does not exist
    InvalidArgument,
}

/// Errors returned by the document operations.
///
/// A row deletion that matches no row is not an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened, read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The package lacks a required part or holds inconsistent data
    #[error("Format error: {0}")]
    Format(String),

    /// An argument does not match the document (e.g. unknown sheet name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Format(_) => ErrorKind::Format,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }
}

impl From<XlsxError> for Error {
    fn from(err: XlsxError) -> Self {
        match err {
            XlsxError::Io(e) => Error::Io(e),
            XlsxError::Zip(zip::result::ZipError::Io(e)) => Error::Io(e),
            XlsxError::Core(e) => e.into(),
            other => Error::Format(other.to_string()),
        }
    }
}

impl From<sheetcrud_core::Error> for Error {
    fn from(err: sheetcrud_core::Error) -> Self {
        match err {
            sheetcrud_core::Error::SheetNotFound(name) => {
                Error::InvalidArgument(format!("Invalid sheet name: {}", name))
            }
            other => Error::Format(other.to_string()),
        }
    }
}
