//! Merging yearly exports of one lab into a single table.
//!
//! Some labs export one file per year and older years were saved without a
//! header row, so their first data line was read as the header.

use salesprep_ingest::{RawTable, unnamed_header};
use tracing::{debug, warn};

use crate::error::{NormalizeError, Result};

/// One yearly export: file name plus its table.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyExport {
    pub name: String,
    pub table: RawTable,
}

impl YearlyExport {
    pub fn new(name: impl Into<String>, table: RawTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

/// Last plausible four-digit year in a file name.
///
/// ```
/// use salesprep_transform::export_year;
/// assert_eq!(export_year("Ashford 2021-2023 sales.xlsx"), Some(2023));
/// assert_eq!(export_year("sales.csv"), None);
/// ```
pub fn export_year(name: &str) -> Option<i32> {
    let bytes = name.as_bytes();
    let mut year = None;
    let mut idx = 0;
    while idx < bytes.len() {
        if !bytes[idx].is_ascii_digit() {
            idx += 1;
            continue;
        }
        let start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx - start == 4 {
            if let Ok(value) = name[start..idx].parse::<i32>() {
                if (1900..=2100).contains(&value) {
                    year = Some(value);
                }
            }
        }
    }
    year
}

/// Merges exports under the header of the latest one.
///
/// The latest export is the one with the highest year in its name, ties and
/// undated names going to the later position. Every export whose header
/// differs has that header line put back as a data row. Rows keep the input
/// order of the exports.
pub fn merge_yearly_exports(exports: Vec<YearlyExport>) -> Result<RawTable> {
    let latest = exports
        .iter()
        .enumerate()
        .max_by_key(|(idx, export)| (export_year(&export.name), *idx))
        .map(|(idx, _)| idx)
        .ok_or(NormalizeError::NoExports)?;
    let headers = exports[latest].table.headers.clone();
    debug!(
        file = %exports[latest].name,
        exports = exports.len(),
        "authoritative header chosen"
    );

    let mut rows = Vec::new();
    for export in exports {
        let YearlyExport { name, table } = export;
        if table.width() != headers.len() {
            return Err(NormalizeError::YearlyExportWidth {
                file: name,
                expected: headers.len(),
                found: table.width(),
            });
        }
        if table.headers != headers {
            warn!(file = %name, "header differs from the latest export; kept as data");
            rows.push(demoted_header(table.headers));
        }
        rows.extend(table.rows);
    }
    Ok(RawTable::new(headers, rows))
}

fn demoted_header(headers: Vec<String>) -> Vec<String> {
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| if name == unnamed_header(idx) { String::new() } else { name })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| (*h).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn years_come_from_the_last_four_digit_run() {
        assert_eq!(export_year("ashford_2022.xlsx"), Some(2022));
        assert_eq!(export_year("2021 to 2024"), Some(2024));
        assert_eq!(export_year("12345 export"), None);
        assert_eq!(export_year("export 3000"), None);
    }

    #[test]
    fn older_header_is_demoted_to_data() {
        let merged = merge_yearly_exports(vec![
            YearlyExport::new(
                "sales 2023.csv",
                table(&["Invoice Date", "Qty"], &[&["2023-01-05", "1"]]),
            ),
            YearlyExport::new("sales 2022.csv", table(&["2022-03-01", ""], &[&["2022-04-01", "2"]])),
        ])
        .expect("merge");
        assert_eq!(merged.headers, vec!["Invoice Date", "Qty"]);
        assert_eq!(
            merged.rows,
            vec![
                vec!["2023-01-05".to_string(), "1".to_string()],
                vec!["2022-03-01".to_string(), String::new()],
                vec!["2022-04-01".to_string(), "2".to_string()],
            ]
        );
    }

    #[test]
    fn width_mismatch_names_the_file() {
        let err = merge_yearly_exports(vec![
            YearlyExport::new("a 2021.csv", table(&["A", "B", "C"], &[])),
            YearlyExport::new("b 2022.csv", table(&["A", "B"], &[])),
        ])
        .expect_err("width");
        assert_eq!(
            err,
            NormalizeError::YearlyExportWidth {
                file: "a 2021.csv".to_string(),
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn nothing_to_merge() {
        assert_eq!(merge_yearly_exports(Vec::new()), Err(NormalizeError::NoExports));
    }
}
