//! Reading reference tables from CSV files or the first workbook sheet.

use std::path::Path;

use salesprep_ingest::{
    RawTable, SheetReadOptions, SourceKind, read_csv_table, read_workbook_with, source_kind,
};

use crate::error::{Result, TaggingError};

/// The table in a CSV file, or the first non-empty sheet of a workbook.
///
/// Workbook rows keep their sheet positions, blank rows included.
pub fn read_reference_table(path: &Path) -> Result<RawTable> {
    let empty = || TaggingError::EmptySource {
        path: path.to_path_buf(),
    };
    match source_kind(path) {
        Some(SourceKind::Csv) => Ok(read_csv_table(path)?),
        Some(SourceKind::Workbook) => {
            let options = SheetReadOptions::default().with_skip_blank_rows(false);
            read_workbook_with(path, options)?
                .into_iter()
                .next()
                .map(|sheet| sheet.table)
                .ok_or_else(empty)
        }
        None => Err(empty()),
    }
}

/// Index of a header, or a missing-column error.
pub(crate) fn column_index(table: &RawTable, column: &str) -> Result<usize> {
    table
        .headers
        .iter()
        .position(|name| name == column)
        .ok_or_else(|| TaggingError::missing(column))
}
