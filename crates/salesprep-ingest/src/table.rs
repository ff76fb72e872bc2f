//! Raw string tables as read from a CSV file or a workbook sheet.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame, NamedFrom};

use crate::error::{IngestError, Result};

/// Label given to a blank header cell at position `idx`.
///
/// ```
/// assert_eq!(salesprep_ingest::unnamed_header(3), "Unnamed: 3");
/// ```
pub fn unnamed_header(idx: usize) -> String {
    format!("Unnamed: {idx}")
}

/// A header row plus string data rows, every row as wide as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Builds a table, padding short rows and naming blank or missing headers.
    ///
    /// Header text is kept exactly as read apart from blank cells, which
    /// become `Unnamed: N`. Rows longer than the header widen the table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);
        let mut headers: Vec<String> = headers
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                if name.trim().is_empty() {
                    unnamed_header(idx)
                } else {
                    name
                }
            })
            .collect();
        while headers.len() < width {
            headers.push(unnamed_header(headers.len()));
        }
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Splits a grid into header (first row) and data rows.
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Option<Self> {
        if grid.is_empty() {
            return None;
        }
        let headers = grid.remove(0);
        Some(Self::new(headers, grid))
    }

    /// Header row followed by the data rows.
    pub fn into_grid(self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.headers);
        grid.extend(self.rows);
        grid
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Header names that occur more than once, in first-seen order.
    pub fn duplicate_headers(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for name in &self.headers {
            if !seen.insert(name.as_str()) && !duplicates.contains(name) {
                duplicates.push(name.clone());
            }
        }
        duplicates
    }

    pub fn has_unique_headers(&self) -> bool {
        self.duplicate_headers().is_empty()
    }

    /// Converts to an all-string frame; blank cells become nulls.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let duplicates = self.duplicate_headers();
        if !duplicates.is_empty() {
            return Err(IngestError::DuplicateColumns {
                columns: duplicates,
            });
        }
        let columns = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<Option<&str>> = self
                    .rows
                    .iter()
                    .map(|row| {
                        let cell = row[idx].as_str();
                        (!cell.trim().is_empty()).then_some(cell)
                    })
                    .collect();
                Column::new(name.as_str().into(), values)
            })
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesprep_common::text_column;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn blank_headers_become_unnamed() {
        let table = RawTable::new(strings(&["Code", "", " "]), vec![strings(&["A", "1"])]);
        assert_eq!(table.headers, strings(&["Code", "Unnamed: 1", "Unnamed: 2"]));
        assert_eq!(table.rows[0], strings(&["A", "1", ""]));
    }

    #[test]
    fn long_rows_widen_the_header() {
        let table = RawTable::new(strings(&["Code"]), vec![strings(&["A", "extra"])]);
        assert_eq!(table.headers, strings(&["Code", "Unnamed: 1"]));
    }

    #[test]
    fn duplicates_are_reported_once() {
        let table = RawTable::new(strings(&["Qty", "Code", "Qty", "Qty"]), Vec::new());
        assert_eq!(table.duplicate_headers(), strings(&["Qty"]));
        assert!(!table.has_unique_headers());
        assert!(matches!(
            table.to_frame(),
            Err(IngestError::DuplicateColumns { .. })
        ));
    }

    #[test]
    fn to_frame_nulls_blank_cells() {
        let table = RawTable::new(
            strings(&["Code", "Qty"]),
            vec![strings(&["A", "1"]), strings(&["", "2"])],
        );
        let df = table.to_frame().expect("frame");
        assert_eq!(df.height(), 2);
        assert_eq!(
            text_column(&df, "Code").expect("code"),
            vec![Some("A".to_string()), None]
        );
    }

    #[test]
    fn grid_round_trip_keeps_header_first() {
        let grid = vec![strings(&["a", "b"]), strings(&["1", "2"])];
        let table = RawTable::from_grid(grid.clone()).expect("table");
        assert_eq!(table.height(), 1);
        assert_eq!(table.into_grid(), grid);
        assert!(RawTable::from_grid(Vec::new()).is_none());
    }
}
