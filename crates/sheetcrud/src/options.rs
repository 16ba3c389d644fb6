//! Codec options

use std::sync::Arc;

use sheetcrud_core::{FirstRowRule, ReferenceRowRule, RowIndexRule};
use sheetcrud_xlsx::{Compression, WriteOptions};

/// Options for the document operations
#[derive(Debug, Clone)]
pub struct CodecOptions {
    /// Rule deriving the row index addressed by a cell reference
    /// (default: [`FirstRowRule`], every reference addresses row 1)
    pub row_rule: Arc<dyn RowIndexRule>,
    /// Compression for saved parts (default: deflate)
    pub compression: Compression,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            row_rule: Arc::new(FirstRowRule),
            compression: Compression::Deflated,
        }
    }
}

impl CodecOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom row-index rule
    pub fn with_row_rule<R: RowIndexRule + 'static>(mut self, rule: R) -> Self {
        self.row_rule = Arc::new(rule);
        self
    }

    /// Address the row named by each reference's digits (`"A5"` -> row 5)
    pub fn parse_row_numbers(self) -> Self {
        self.with_row_rule(ReferenceRowRule)
    }

    /// Set the compression for saved parts
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub(crate) fn write_options(&self) -> WriteOptions {
        WriteOptions {
            compression: self.compression,
        }
    }
}
