//! Labtrac order-line exports.

use polars::prelude::DataFrame;
use salesprep_model::fields;
use tracing::debug;

use crate::dates::{DateStrategy, format_iso_date};
use crate::error::{NormalizeError, Result};
use crate::frame::{CanonicalFrame, SourceFrame, unit_prices};
use crate::policy::LabPolicy;

pub(crate) const SYSTEM_SOURCE: &str = "Labtrac";

/// Completion date column names, in preference order.
const COMPLETED_DATE_COLUMNS: [&str; 3] = ["CompletedDate", "Date", "Invoice Date"];

/// New-format export (also the merged Ashford yearly exports).
pub(crate) fn normalize_new(raw: &DataFrame, lab: &str, policy: &LabPolicy) -> Result<DataFrame> {
    let mut source = SourceFrame::new(raw.clone());
    let date_column = source.first_present(&COMPLETED_DATE_COLUMNS)?;
    let strategy = &policy.date_strategy;

    // Orders without a completion date are not invoiced yet.
    let raw_dates = source.text(date_column)?;
    let keep: Vec<bool> = raw_dates
        .iter()
        .map(|value| value.as_deref().is_some_and(|v| !strategy.is_sentinel(v)))
        .collect();
    source.retain(&keep)?;
    let dates = parse_dates(&source, date_column, strategy)?;

    let quantity = source.amounts("Qty")?;
    let net_sales = source.amounts("Value")?;
    let category = if source.has("Category") {
        Some(source.text("Category")?)
    } else {
        None
    };
    let category = category.filter(|values| policy.category_rule.keeps(values));

    let mut frame = CanonicalFrame::new(source.height())
        .row_ids(fields::ORDER_UUID)
        .text(fields::ORDER_INVOICED_DATE, dates)
        .constant(fields::SYSTEM_SOURCE, SYSTEM_SOURCE)
        .constant(fields::ALS_LAB, lab)
        .text(fields::PRACTICE_NAME, source.text("Delivery 1")?)
        .text(fields::PRACTICE_ADDRESS_ROAD, source.text("Delivery 2")?)
        .text(fields::PRACTICE_ADDRESS_TOWN, source.text("Delivery 3")?)
        .text(fields::PRACTICE_ADDRESS_POSTCODE, source.text("Delivery 5")?)
        .text(fields::CUSTOMER_ID, source.identifiers("Code")?)
        .text(fields::CUSTOMER_NAME, source.text("Name")?)
        .text(fields::PRODUCT_CODE, source.text("Product Link")?)
        .text(fields::PRODUCT_DESCRIPTION, source.text("Description")?);
    if let Some(category) = category {
        frame = frame.text(fields::PRODUCT_CATEGORY, category);
    }
    let unit_net_price = unit_prices(&net_sales, &quantity);
    let df = frame
        .amounts(fields::QUANTITY, quantity)
        .amounts(fields::NET_SALES, net_sales)
        .text(fields::NHS_OR_PRIVATE, source.text("Standard")?)
        .amounts(fields::UNIT_NET_PRICE, unit_net_price)
        .build()?;
    debug!(lab, rows_in = raw.height(), rows_out = df.height(), "normalized labtrac export");
    Ok(df)
}

/// Old-format export with currency and status columns.
pub(crate) fn normalize_old(raw: &DataFrame, lab: &str) -> Result<DataFrame> {
    let mut source = SourceFrame::new(raw.clone());
    let keep: Vec<bool> = source
        .text("InvoiceDate")?
        .iter()
        .map(Option::is_some)
        .collect();
    source.retain(&keep)?;
    let dates = parse_dates(&source, "InvoiceDate", &DateStrategy::Inferred)?;

    let quantity = source.amounts("Qty")?;
    let net_sales = source.amounts("Net")?;
    let unit_net_price = unit_prices(&net_sales, &quantity);
    let df = CanonicalFrame::new(source.height())
        .row_ids(fields::ORDER_UUID)
        .text(fields::ORDER_INVOICED_DATE, dates)
        .constant(fields::SYSTEM_SOURCE, SYSTEM_SOURCE)
        .constant(fields::ALS_LAB, lab)
        .text(fields::PRACTICE_NAME, source.text("Address1")?)
        .text(fields::PRACTICE_ADDRESS_ROAD, source.text("Address2")?)
        .text(fields::PRACTICE_ADDRESS_TOWN, source.text("Address3")?)
        .text(fields::PRACTICE_ADDRESS_POSTCODE, source.text("Address5")?)
        .text(fields::CUSTOMER_ID, source.identifiers("DoctorId")?)
        .text(fields::CUSTOMER_NAME, source.text("DoctorName")?)
        .text(fields::PRODUCT_CODE, source.text("ProductId")?)
        .text(fields::PRODUCT_DESCRIPTION, source.text("ProductName")?)
        .amounts(fields::QUANTITY, quantity)
        .amounts(fields::NET_SALES, net_sales)
        .text(fields::ORDER_STATUS, source.text("Status")?)
        .text(fields::CURRENCY_SYMBOL, source.text("CurrencySymbol")?)
        .text(fields::CURRENCY_DESCRIPTION, source.text("CurrencyDescription")?)
        .amounts(fields::UNIT_NET_PRICE, unit_net_price)
        .build()?;
    debug!(lab, rows_in = raw.height(), rows_out = df.height(), "normalized old labtrac export");
    Ok(df)
}

fn parse_dates(
    source: &SourceFrame,
    column: &str,
    strategy: &DateStrategy,
) -> Result<Vec<Option<String>>> {
    source
        .text(column)?
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let value = value.unwrap_or_default();
            strategy
                .parse(&value)
                .map(|date| Some(format_iso_date(date)))
                .ok_or_else(|| NormalizeError::InvalidDate {
                    column: column.to_string(),
                    row: source.row_number(idx),
                    value,
                })
        })
        .collect()
}
