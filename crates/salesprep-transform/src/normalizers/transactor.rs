//! Transactor customer/product cube reports.

use polars::prelude::DataFrame;
use salesprep_model::fields;
use tracing::debug;

use super::totals::reconcile_report_totals;
use crate::error::{NormalizeError, Result};
use crate::frame::{CanonicalFrame, SourceFrame};

pub(crate) const SYSTEM_SOURCE: &str = "Transactor";

const UNKNOWN: &str = "Unknown";
const TOTALS_COLUMNS: [&str; 3] = ["Qty", "Net_Sales", "Tax_Sales"];

/// Vendor column names of one Transactor flavour.
struct Layout {
    width: usize,
    ship_id: &'static str,
    ship_name: &'static str,
    ship_address: Option<&'static str>,
    customer_id: &'static str,
    /// Fill for a blank customer id; `None` keeps blanks.
    customer_id_fill: Option<&'static str>,
    price_band: Option<&'static str>,
    net_unit_price: Option<&'static str>,
    discounted_unit_price: Option<&'static str>,
}

const STANDARD: Layout = Layout {
    width: 15,
    ship_id: "ShipID",
    ship_name: "ShipFullName",
    ship_address: Some("ShipAddress"),
    customer_id: "CustID",
    customer_id_fill: None,
    price_band: Some("PriceBand"),
    net_unit_price: Some("NetUnitPrice"),
    discounted_unit_price: Some("DiscountedUnitPrice"),
};

const PASSION: Layout = Layout {
    width: 11,
    ship_id: "shipid",
    ship_name: "shipfullname",
    ship_address: None,
    customer_id: "custID",
    customer_id_fill: Some(UNKNOWN),
    price_band: None,
    net_unit_price: None,
    discounted_unit_price: None,
};

pub(crate) fn normalize_standard(raw: &DataFrame, lab: &str) -> Result<DataFrame> {
    normalize(raw, lab, &STANDARD)
}

pub(crate) fn normalize_passion(raw: &DataFrame, lab: &str) -> Result<DataFrame> {
    normalize(raw, lab, &PASSION)
}

fn normalize(raw: &DataFrame, lab: &str, layout: &Layout) -> Result<DataFrame> {
    if raw.width() != layout.width {
        return Err(NormalizeError::ColumnCount {
            expected: layout.width,
            found: raw.width(),
        });
    }
    let mut source = SourceFrame::new(raw.clone());
    let keep = reconcile_report_totals(&source, "Description", &TOTALS_COLUMNS)?;
    source.retain(&keep)?;

    let height = source.height();
    let optional_text = |column: Option<&str>, fill: &str| -> Result<Vec<Option<String>>> {
        match column {
            Some(column) => source.text_or(column, fill),
            None => Ok(vec![Some(fill.to_string()); height]),
        }
    };
    let optional_amounts = |column: Option<&str>| -> Result<Vec<Option<f64>>> {
        match column {
            Some(column) => source.amounts(column),
            None => Ok(vec![None; height]),
        }
    };
    let customer_ids = match layout.customer_id_fill {
        Some(fill) => source
            .identifiers(layout.customer_id)?
            .into_iter()
            .map(|id| id.or_else(|| Some(fill.to_string())))
            .collect(),
        None => source.identifiers(layout.customer_id)?,
    };
    let ship_ids = source
        .identifiers(layout.ship_id)?
        .into_iter()
        .map(|id| id.or_else(|| Some("0".to_string())))
        .collect();

    let df = CanonicalFrame::new(height)
        .row_ids(fields::CUSTOMER_PRODUCT_CUBE_UUID)
        .text(fields::YEAR_MONTH, source.year_months("Year", "Month")?)
        .constant(fields::SYSTEM_SOURCE, SYSTEM_SOURCE)
        .constant(fields::ALS_LAB, lab)
        .text(fields::SHIP_ID, ship_ids)
        .text(fields::SHIP_NAME, source.text_or(layout.ship_name, UNKNOWN)?)
        .text(fields::SHIP_ADDRESS, optional_text(layout.ship_address, UNKNOWN)?)
        .text(fields::CUSTOMER_ID, customer_ids)
        .text(fields::CUSTOMER_NAME, source.text_or("CustFullName", UNKNOWN)?)
        .text(fields::PRODUCT_CODE, source.text("code")?)
        .text(fields::PRODUCT_DESCRIPTION, source.text("Description")?)
        .text(fields::ORIGINAL_LAB_PRICE_BAND, optional_text(layout.price_band, UNKNOWN)?)
        .amounts(fields::NET_UNIT_PRICE, optional_amounts(layout.net_unit_price)?)
        .amounts(
            fields::DISCOUNTED_UNIT_PRICE,
            optional_amounts(layout.discounted_unit_price)?,
        )
        .amounts(fields::QUANTITY, source.amounts("Qty")?)
        .amounts(fields::NET_SALES, source.amounts("Net_Sales")?)
        .amounts(fields::TAX_SALES, source.amounts("Tax_Sales")?)
        .build()?;
    debug!(lab, rows_in = raw.height(), rows_out = df.height(), "normalized transactor report");
    Ok(df)
}
