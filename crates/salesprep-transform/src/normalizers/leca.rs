//! Leca custom monthly reports.

use polars::prelude::DataFrame;
use salesprep_ingest::unnamed_header;
use salesprep_model::fields;
use tracing::debug;

use crate::error::{NormalizeError, Result};
use crate::frame::{CanonicalFrame, SourceFrame, unit_prices};

pub(crate) const SYSTEM_SOURCE: &str = "Custom";

/// Positional names of the twelve report columns.
const COLUMNS: [&str; 12] = [
    "Year",
    "Month",
    "Practice Post Code or Identifier",
    "Practice Name",
    "Customer Account",
    "Dentist",
    "Product Code",
    "Product Description",
    "NHS /Private/Independent/PPE",
    "Quantity",
    "Invoice Amount",
    "Invoice VAT",
];

pub(crate) fn normalize(raw: &DataFrame, lab: &str) -> Result<DataFrame> {
    if raw.width() != COLUMNS.len() {
        return Err(NormalizeError::ColumnCount {
            expected: COLUMNS.len(),
            found: raw.width(),
        });
    }
    let mut df = raw.clone();
    // Saved with a blank header row: the real header is the first data row.
    if df.get_column_names().iter().any(|name| name.as_str() == unnamed_header(0)) {
        df = df.slice(1, df.height().saturating_sub(1));
    }
    df.set_column_names(COLUMNS)?;
    let source = SourceFrame::new(df);

    let quantity = source.amounts("Quantity")?;
    // Net is only known when both amount and VAT are.
    let net_sales: Vec<Option<f64>> = source
        .amounts("Invoice Amount")?
        .into_iter()
        .zip(source.amounts("Invoice VAT")?)
        .map(|(amount, vat)| amount.zip(vat).map(|(amount, vat)| amount - vat))
        .collect();
    let net_unit_price = unit_prices(&net_sales, &quantity);

    let out = CanonicalFrame::new(source.height())
        .row_ids(fields::CUSTOMER_PRODUCT_CUBE_UUID)
        .text(fields::YEAR_MONTH, source.year_months("Year", "Month")?)
        .constant(fields::SYSTEM_SOURCE, SYSTEM_SOURCE)
        .constant(fields::ALS_LAB, lab)
        .text(fields::PRACTICE_CODE, source.text("Practice Post Code or Identifier")?)
        .text(fields::PRACTICE_NAME, source.text("Practice Name")?)
        .text(fields::CUSTOMER_ID, source.identifiers("Customer Account")?)
        .text(fields::CUSTOMER_NAME, source.text("Dentist")?)
        .text(fields::PRODUCT_CODE, source.identifiers("Product Code")?)
        .text(fields::PRODUCT_DESCRIPTION, source.text("Product Description")?)
        .amounts(fields::QUANTITY, quantity)
        .amounts(fields::NET_SALES, net_sales)
        .text(fields::NHS_OR_PRIVATE, source.text("NHS /Private/Independent/PPE")?)
        .amounts(fields::NET_UNIT_PRICE, net_unit_price)
        .build()?;
    debug!(lab, rows_in = raw.height(), rows_out = out.height(), "normalized leca report");
    Ok(out)
}
