//! Error types for normalization and dispatch.

use salesprep_model::SchemaId;
use thiserror::Error;

/// Failure while normalizing one table. Aborts that table only.
///
/// Everything except [`NormalizeError::DataFrame`] is a reconciliation
/// error: an internal cross-check on the vendor data failed.
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("required column '{column}' not found")]
    MissingColumn { column: String },

    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("no '{marker}' row to reconcile against")]
    MissingTotals { marker: String },

    #[error("sum of {column} is {rows_total}, report total is {report_total}")]
    TotalsMismatch {
        column: String,
        rows_total: f64,
        report_total: f64,
    },

    #[error("unparseable date {value:?} in column '{column}' at data row {row}")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },

    #[error("invalid number {value:?} in column '{column}' at data row {row}")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("report month not found in the report heading")]
    ReportMonthNotFound,

    #[error("no header row containing {}", required.join(" and "))]
    HeaderRowNotFound { required: Vec<String> },

    #[error("yearly export {file} has {found} columns, expected {expected}")]
    YearlyExportWidth {
        file: String,
        expected: usize,
        found: usize,
    },

    #[error("no yearly exports to merge")]
    NoExports,

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl NormalizeError {
    pub fn is_reconciliation(&self) -> bool {
        !matches!(self, Self::DataFrame { .. })
    }

    pub(crate) fn missing(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for NormalizeError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;

/// The dispatch table and the registry disagree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("registered schemas without a normalizer: {}", join_ids(.0))]
    Unmapped(Vec<SchemaId>),
    #[error("normalizers mapped to unregistered schemas: {}", join_ids(.0))]
    Unregistered(Vec<SchemaId>),
}

fn join_ids(ids: &[SchemaId]) -> String {
    ids.iter()
        .map(SchemaId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
