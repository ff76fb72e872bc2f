//! Error types for tagging and mapping tables.

use std::path::PathBuf;

use salesprep_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaggingError {
    /// A price list or sales frame lacks a column the tagger reads.
    #[error("column '{column}' not found")]
    MissingColumn { column: String },

    /// A price-list file had no sheet or table to read.
    #[error("no table found in {path}")]
    EmptySource { path: PathBuf },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl TaggingError {
    pub(crate) fn missing(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for TaggingError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaggingError>;
