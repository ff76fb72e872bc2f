//! Workbook reading: every sheet becomes its own raw table.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveTime;
use salesprep_common::format_numeric;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::table::RawTable;

/// One sheet of a workbook.
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub sheet: String,
    pub table: RawTable,
}

/// Options for [`read_workbook_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetReadOptions {
    /// Drop rows whose cells are all blank. Reference sheets read by row
    /// position keep them.
    pub skip_blank_rows: bool,
}

impl Default for SheetReadOptions {
    fn default() -> Self {
        Self {
            skip_blank_rows: true,
        }
    }
}

impl SheetReadOptions {
    #[must_use]
    pub fn with_skip_blank_rows(mut self, skip: bool) -> Self {
        self.skip_blank_rows = skip;
        self
    }
}

/// Reads every non-empty sheet of a workbook, in workbook order, skipping
/// blank rows.
///
/// The first row of a sheet is its header. Sheets that start right of column
/// A are padded so `Unnamed: N` labels keep the sheet's column positions.
pub fn read_workbook(path: &Path) -> Result<Vec<SheetTable>> {
    read_workbook_with(path, SheetReadOptions::default())
}

/// [`read_workbook`] with explicit options.
pub fn read_workbook_with(path: &Path, options: SheetReadOptions) -> Result<Vec<SheetTable>> {
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let mut sheets = Vec::new();
    for sheet in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| workbook_error(format!("sheet {sheet}: {e}")))?;
        let left_pad = range.start().map_or(0, |(_, col)| col as usize);
        let grid = sheet_grid(
            range.rows().map(|row| row.iter().map(cell_text).collect()),
            left_pad,
            options,
        );
        let Some(table) = RawTable::from_grid(grid) else {
            debug!(path = %path.display(), sheet = %sheet, "skipping empty sheet");
            continue;
        };
        debug!(
            path = %path.display(),
            sheet = %sheet,
            columns = table.width(),
            rows = table.height(),
            "read workbook sheet"
        );
        sheets.push(SheetTable { sheet, table });
    }
    Ok(sheets)
}

/// Left-pads each row and applies the blank-row option.
///
/// Leading blank rows are always dropped so the header is the first row with
/// content.
fn sheet_grid(
    rows: impl Iterator<Item = Vec<String>>,
    left_pad: usize,
    options: SheetReadOptions,
) -> Vec<Vec<String>> {
    let is_blank = |row: &[String]| row.iter().all(|cell| cell.trim().is_empty());
    let mut grid: Vec<Vec<String>> = Vec::new();
    for row in rows {
        if is_blank(&row) && (options.skip_blank_rows || grid.is_empty()) {
            continue;
        }
        grid.push(
            std::iter::repeat_n(String::new(), left_pad)
                .chain(row)
                .collect(),
        );
    }
    if !options.skip_blank_rows {
        while grid.last().is_some_and(|row| is_blank(row)) {
            grid.pop();
        }
    }
    grid
}

#[allow(unreachable_patterns)]
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(v) => v.to_string(),
        Data::Float(v) => format_numeric(*v),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => match v.as_datetime() {
            Some(dt) if dt.time() == NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_numeric(v.as_f64()),
        },
        _ => String::new(),
    }
}
