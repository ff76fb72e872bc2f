//! Report-totals reconciliation for aggregate exports.

use tracing::debug;

use crate::error::{NormalizeError, Result};
use crate::frame::SourceFrame;

pub const REPORT_TOTALS_MARKER: &str = "REPORT TOTALS:";
pub const TOTALS_TOLERANCE: f64 = 0.01;

/// Checks every `columns` sum against the first totals row and returns the
/// keep mask that drops the totals rows.
pub(crate) fn reconcile_report_totals(
    source: &SourceFrame,
    marker_column: &str,
    columns: &[&str],
) -> Result<Vec<bool>> {
    let is_total: Vec<bool> = source
        .text(marker_column)?
        .iter()
        .map(|value| value.as_deref() == Some(REPORT_TOTALS_MARKER))
        .collect();
    let Some(total_idx) = is_total.iter().position(|flag| *flag) else {
        return Err(NormalizeError::MissingTotals {
            marker: REPORT_TOTALS_MARKER.to_string(),
        });
    };

    for column in columns {
        let amounts = source.amounts(column)?;
        let rows_total: f64 = amounts
            .iter()
            .zip(&is_total)
            .filter(|(_, total)| !**total)
            .filter_map(|(value, _)| *value)
            .sum();
        let report_total = amounts[total_idx].unwrap_or(0.0);
        if (rows_total - report_total).abs() > TOTALS_TOLERANCE {
            return Err(NormalizeError::TotalsMismatch {
                column: (*column).to_string(),
                rows_total,
                report_total,
            });
        }
        debug!(column, rows_total, report_total, "report total reconciled");
    }

    Ok(is_total.iter().map(|total| !total).collect())
}
