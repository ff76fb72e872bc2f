//! Stacking per-file outputs of one bucket.

use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult};
use salesprep_common::{has_column, text_column};
use tracing::debug;

/// Stacks frames as text, with the union of their columns in first-seen
/// order. Cells of a column a frame lacks are null.
pub fn combine_frames(frames: &[DataFrame]) -> PolarsResult<DataFrame> {
    let mut names: Vec<String> = Vec::new();
    for df in frames {
        for name in df.get_column_names() {
            if !names.iter().any(|existing| existing == name.as_str()) {
                names.push(name.to_string());
            }
        }
    }

    let total: usize = frames.iter().map(DataFrame::height).sum();
    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        let mut values: Vec<Option<String>> = Vec::with_capacity(total);
        for df in frames {
            if has_column(df, name) {
                values.extend(text_column(df, name)?);
            } else {
                values.extend(std::iter::repeat_n(None, df.height()));
            }
        }
        columns.push(Column::new(name.as_str().into(), values));
    }
    debug!(frames = frames.len(), rows = total, columns = names.len(), "combined frames");
    DataFrame::new(columns)
}
