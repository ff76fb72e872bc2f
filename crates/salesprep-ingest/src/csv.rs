//! CSV reading into raw tables and writing frames back out.

use std::fs;
use std::path::Path;

use polars::prelude::{AnyValue, DataFrame};
use salesprep_common::any_to_string;
use tracing::{debug, warn};

use crate::decode::{TextEncoding, decode_text};
use crate::error::{IngestError, Result};
use crate::table::RawTable;

/// Reads and decodes a whole text file.
///
/// A Latin-1 fallback is logged at warn level and is not an error.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| IngestError::file_read(path, e))?;
    let (text, encoding) = decode_text(&bytes).ok_or_else(|| IngestError::Decode {
        path: path.to_path_buf(),
    })?;
    if encoding == TextEncoding::Latin1 {
        warn!(
            path = %path.display(),
            encoding = encoding.as_str(),
            "file is not valid UTF-8, decoded with fallback"
        );
    }
    Ok(text)
}

/// Reads only the header row of a CSV file.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let text = read_text(path)?;
    let mut records = parse_records(&text, path, Some(1))?;
    if records.is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(RawTable::new(records.remove(0), Vec::new()).headers)
}

/// Reads a CSV file into a raw table. Fully blank lines are skipped.
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let text = read_text(path)?;
    let grid = parse_records(&text, path, None)?;
    let table = RawTable::from_grid(grid).ok_or_else(|| IngestError::EmptyFile {
        path: path.to_path_buf(),
    })?;
    debug!(
        path = %path.display(),
        columns = table.width(),
        rows = table.height(),
        "read csv table"
    );
    Ok(table)
}

/// Reads a CSV file straight into an all-string frame.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    read_csv_table(path)?.to_frame()
}

fn parse_records(text: &str, path: &Path, limit: Option<usize>) -> Result<Vec<Vec<String>>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut grid = Vec::new();
    for record in reader.records() {
        if limit.is_some_and(|limit| grid.len() >= limit) {
            break;
        }
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

/// Writes a frame as CSV, creating parent directories. Nulls become empty fields.
pub fn write_csv_frame(df: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let csv_error = |e: ::csv::Error| IngestError::CsvWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut writer = ::csv::Writer::from_path(path).map_err(csv_error)?;
    let names: Vec<&str> = df.get_column_names().iter().map(|name| name.as_str()).collect();
    writer.write_record(&names).map_err(csv_error)?;
    let columns = df.get_columns();
    let mut record = Vec::with_capacity(columns.len());
    for idx in 0..df.height() {
        record.clear();
        for column in columns {
            record.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        writer.write_record(&record).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
