//! Reading vendor columns and assembling canonical frames.

use polars::prelude::{Column, DataFrame, NamedFrom};
use salesprep_common::{filter_rows, has_column, parse_amount, text_column};
use uuid::Uuid;

use crate::dates::{first_of_month, format_iso_date, month_number, year_number};
use crate::error::{NormalizeError, Result};

/// A raw all-string frame plus the 1-based data row number of each row,
/// so errors keep pointing at the vendor file after rows are filtered.
pub(crate) struct SourceFrame {
    df: DataFrame,
    rows: Vec<usize>,
}

impl SourceFrame {
    pub(crate) fn new(df: DataFrame) -> Self {
        let rows = (1..=df.height()).collect();
        Self { df, rows }
    }

    pub(crate) fn height(&self) -> usize {
        self.df.height()
    }

    pub(crate) fn width(&self) -> usize {
        self.df.width()
    }

    pub(crate) fn has(&self, column: &str) -> bool {
        has_column(&self.df, column)
    }

    /// Column name at a position.
    pub(crate) fn name_at(&self, idx: usize) -> Result<String> {
        self.df
            .get_column_names()
            .get(idx)
            .map(|name| name.to_string())
            .ok_or_else(|| NormalizeError::ColumnCount {
                expected: idx + 1,
                found: self.width(),
            })
    }

    /// First of `candidates` present in the frame.
    pub(crate) fn first_present<'c>(&self, candidates: &[&'c str]) -> Result<&'c str> {
        candidates
            .iter()
            .copied()
            .find(|name| self.has(name))
            .ok_or_else(|| NormalizeError::missing(candidates.first().copied().unwrap_or("")))
    }

    pub(crate) fn retain(&mut self, keep: &[bool]) -> Result<()> {
        filter_rows(&mut self.df, keep)?;
        self.rows = self
            .rows
            .iter()
            .zip(keep)
            .filter_map(|(row, keep)| keep.then_some(*row))
            .collect();
        Ok(())
    }

    pub(crate) fn row_number(&self, idx: usize) -> usize {
        self.rows.get(idx).copied().unwrap_or(idx + 1)
    }

    /// Trimmed text, blank cells as `None`.
    pub(crate) fn text(&self, column: &str) -> Result<Vec<Option<String>>> {
        if !self.has(column) {
            return Err(NormalizeError::missing(column));
        }
        Ok(text_column(&self.df, column)?)
    }

    /// Text with blanks replaced by `fallback`.
    pub(crate) fn text_or(&self, column: &str, fallback: &str) -> Result<Vec<Option<String>>> {
        Ok(self
            .text(column)?
            .into_iter()
            .map(|value| Some(value.unwrap_or_else(|| fallback.to_string())))
            .collect())
    }

    /// Identifier text; whole numbers lose a spreadsheet `.0` suffix.
    pub(crate) fn identifiers(&self, column: &str) -> Result<Vec<Option<String>>> {
        Ok(self
            .text(column)?
            .into_iter()
            .map(|value| value.map(|v| identifier_text(&v)))
            .collect())
    }

    /// Amounts with currency symbols and thousands separators stripped.
    pub(crate) fn amounts(&self, column: &str) -> Result<Vec<Option<f64>>> {
        self.text(column)?
            .into_iter()
            .enumerate()
            .map(|(idx, value)| match value {
                None => Ok(None),
                Some(text) => parse_amount(&text).map_err(|_| NormalizeError::InvalidNumber {
                    column: column.to_string(),
                    row: self.row_number(idx),
                    value: text,
                }),
            })
            .collect()
    }

    /// First-of-month ISO dates from separate year and month columns.
    pub(crate) fn year_months(&self, year: &str, month: &str) -> Result<Vec<Option<String>>> {
        let years = self.text(year)?;
        let months = self.text(month)?;
        years
            .into_iter()
            .zip(months)
            .enumerate()
            .map(|(idx, (y, m))| {
                let y = y.unwrap_or_default();
                let m = m.unwrap_or_default();
                year_number(&y)
                    .zip(month_number(&m))
                    .and_then(|(y, m)| first_of_month(y, m))
                    .map(|date| Some(format_iso_date(date)))
                    .ok_or_else(|| NormalizeError::InvalidDate {
                        column: format!("{year}/{month}"),
                        row: self.row_number(idx),
                        value: format!("{y}/{m}"),
                    })
            })
            .collect()
    }
}

/// `123.0` → `123`; anything else unchanged.
pub(crate) fn identifier_text(value: &str) -> String {
    let Some((whole, fraction)) = value.split_once('.') else {
        return value.to_string();
    };
    let is_whole_number = !whole.is_empty()
        && whole.trim_start_matches('-').chars().all(|ch| ch.is_ascii_digit())
        && fraction.chars().all(|ch| ch == '0');
    if is_whole_number {
        whole.to_string()
    } else {
        value.to_string()
    }
}

/// Canonical output assembled column by column, in output order.
pub(crate) struct CanonicalFrame {
    height: usize,
    columns: Vec<Column>,
}

impl CanonicalFrame {
    pub(crate) fn new(height: usize) -> Self {
        Self {
            height,
            columns: Vec::new(),
        }
    }

    /// Fresh UUID v4 per row.
    pub(crate) fn row_ids(mut self, name: &str) -> Self {
        let ids: Vec<String> = (0..self.height)
            .map(|_| Uuid::new_v4().to_string())
            .collect();
        self.columns.push(Column::new(name.into(), ids));
        self
    }

    pub(crate) fn constant(mut self, name: &str, value: &str) -> Self {
        self.columns
            .push(Column::new(name.into(), vec![value; self.height]));
        self
    }

    pub(crate) fn text(mut self, name: &str, values: Vec<Option<String>>) -> Self {
        self.columns.push(Column::new(name.into(), values));
        self
    }

    pub(crate) fn amounts(mut self, name: &str, values: Vec<Option<f64>>) -> Self {
        self.columns.push(Column::new(name.into(), values));
        self
    }

    pub(crate) fn build(self) -> Result<DataFrame> {
        Ok(DataFrame::new(self.columns)?)
    }
}

/// Element-wise `net / quantity` with the null sentinel.
pub(crate) fn unit_prices(net: &[Option<f64>], quantity: &[Option<f64>]) -> Vec<Option<f64>> {
    net.iter()
        .zip(quantity)
        .map(|(net, qty)| salesprep_common::safe_ratio(*net, *qty))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> SourceFrame {
        SourceFrame::new(
            DataFrame::new(vec![
                Column::new("Qty".into(), vec![Some("1"), Some("£2,000"), Some("x")]),
                Column::new("Id".into(), vec![Some("12.0"), Some("A7"), None]),
            ])
            .expect("frame"),
        )
    }

    #[test]
    fn invalid_amounts_name_the_original_row() {
        let mut source = frame();
        source.retain(&[false, true, true]).expect("retain");
        let err = source.amounts("Qty").expect_err("invalid");
        assert_eq!(
            err,
            NormalizeError::InvalidNumber {
                column: "Qty".to_string(),
                row: 3,
                value: "x".to_string()
            }
        );
    }

    #[test]
    fn identifiers_drop_float_suffix() {
        let source = frame();
        assert_eq!(
            source.identifiers("Id").expect("ids"),
            vec![Some("12".to_string()), Some("A7".to_string()), None]
        );
        assert_eq!(identifier_text("1e3"), "1e3");
        assert_eq!(identifier_text("0012"), "0012");
        assert_eq!(identifier_text("4.50"), "4.50");
        assert_eq!(identifier_text("v1.0"), "v1.0");
    }

    #[test]
    fn missing_columns_are_reported() {
        let source = frame();
        assert_eq!(
            source.text("Nope").expect_err("missing"),
            NormalizeError::missing("Nope")
        );
        assert_eq!(source.first_present(&["Date", "Qty"]).expect("present"), "Qty");
    }

    #[test]
    fn canonical_frame_row_ids_are_unique() {
        let df = CanonicalFrame::new(3)
            .row_ids("order_uuid")
            .constant("system_source", "Labtrac")
            .build()
            .expect("frame");
        let ids = salesprep_common::text_values(&df, "order_uuid").expect("ids");
        let unique: std::collections::BTreeSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(ids.iter().all(|id| !id.is_empty()));
    }
}
