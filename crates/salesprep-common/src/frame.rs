//! Column helpers over Polars frames.
//!
//! Raw tables are loaded as all-string frames; these helpers read them back
//! as trimmed optional strings and filter their rows.

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray, PolarsResult};

use crate::polars::any_to_string;

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Trimmed cell text with blank cells as `None`.
pub fn text_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
        let trimmed = value.trim();
        values.push((!trimmed.is_empty()).then(|| trimmed.to_string()));
    }
    Ok(values)
}

/// Trimmed cell text with blank cells as empty strings.
pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    Ok(text_column(df, name)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

pub fn filter_rows(df: &mut DataFrame, keep: &[bool]) -> PolarsResult<()> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    *df = df.filter(&mask)?;
    Ok(())
}
