//! Evident monthly customer/product reports.
//!
//! The export is a printed report: a few template rows carrying the report
//! period, then a header row, then customer blocks where the customer cells
//! are merged (blank below the first line) and closed by `Total` rows.

use chrono::{Datelike, NaiveDate};
use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult};
use salesprep_common::text_column;
use salesprep_model::fields;
use tracing::debug;

use crate::dates::{first_of_month, format_iso_date, parse_inferred, parse_month_label};
use crate::error::{NormalizeError, Result};
use crate::frame::{CanonicalFrame, SourceFrame, unit_prices};

pub(crate) const SYSTEM_SOURCE: &str = "Evident";

const CUSTOMER: &str = "Customer";
const CUSTOMER_CODE: &str = "Customer Code";
const PRODUCT_CODE: &str = "Product Code";
const DESCRIPTION_COLUMNS: [&str; 3] = ["Product", "Product Description", "Description"];
const QUANTITY_COLUMNS: [&str; 2] = ["Quantity", "Qty"];
const NET_COLUMNS: [&str; 4] = ["Net Value", "Net", "Net Sales", "Value"];

pub(crate) fn normalize(raw: &DataFrame, lab: &str) -> Result<DataFrame> {
    let grid = frame_grid(raw)?;
    let header_idx = grid
        .iter()
        .position(|row| {
            row.iter().any(|cell| cell == CUSTOMER) && row.iter().any(|cell| cell == PRODUCT_CODE)
        })
        .ok_or_else(|| NormalizeError::HeaderRowNotFound {
            required: vec![CUSTOMER.to_string(), PRODUCT_CODE.to_string()],
        })?;
    let month = grid[..header_idx]
        .iter()
        .find_map(|row| report_month(row))
        .ok_or(NormalizeError::ReportMonthNotFound)?;

    let product_idx = grid[header_idx]
        .iter()
        .position(|cell| cell == PRODUCT_CODE);
    let body: Vec<&Vec<String>> = grid[header_idx + 1..]
        .iter()
        .filter(|row| !is_blank_or_total(row, product_idx))
        .collect();
    let source = SourceFrame::new(body_frame(&grid[header_idx], &body)?);

    let customer_ids = if source.has(CUSTOMER_CODE) {
        forward_fill(source.identifiers(CUSTOMER_CODE)?)
    } else {
        vec![None; source.height()]
    };
    let customers = forward_fill(source.text(CUSTOMER)?);
    let description = source.first_present(&DESCRIPTION_COLUMNS)?;
    let quantity = source.amounts(source.first_present(&QUANTITY_COLUMNS)?)?;
    let net_sales = source.amounts(source.first_present(&NET_COLUMNS)?)?;
    let net_unit_price = unit_prices(&net_sales, &quantity);

    let df = CanonicalFrame::new(source.height())
        .row_ids(fields::CUSTOMER_PRODUCT_CUBE_UUID)
        .constant(fields::YEAR_MONTH, &format_iso_date(month))
        .constant(fields::SYSTEM_SOURCE, SYSTEM_SOURCE)
        .constant(fields::ALS_LAB, lab)
        .text(fields::CUSTOMER_ID, customer_ids)
        .text(fields::CUSTOMER_NAME, customers)
        .text(fields::PRODUCT_CODE, source.identifiers(PRODUCT_CODE)?)
        .text(fields::PRODUCT_DESCRIPTION, source.text(description)?)
        .amounts(fields::QUANTITY, quantity)
        .amounts(fields::NET_SALES, net_sales)
        .amounts(fields::NET_UNIT_PRICE, net_unit_price)
        .build()?;
    debug!(lab, month = %month, rows_out = df.height(), "normalized evident report");
    Ok(df)
}

/// The frame as read plus its header line, as trimmed text rows.
fn frame_grid(raw: &DataFrame) -> Result<Vec<Vec<String>>> {
    let names: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|name| {
            let name = name.as_str();
            if name.starts_with("Unnamed: ") { String::new() } else { name.trim().to_string() }
        })
        .collect();
    let columns = raw
        .get_column_names()
        .iter()
        .map(|name| text_column(raw, name.as_str()))
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut grid = Vec::with_capacity(raw.height() + 1);
    grid.push(names);
    for row in 0..raw.height() {
        grid.push(
            columns
                .iter()
                .map(|column| column[row].clone().unwrap_or_default())
                .collect(),
        );
    }
    Ok(grid)
}

/// First day of the month named by a `Report Period:` or `Month:` line.
fn report_month(row: &[String]) -> Option<NaiveDate> {
    let line = row
        .iter()
        .filter(|cell| !cell.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let (label, value) = line.split_once(':')?;
    let label = label.to_ascii_lowercase();
    if !label.contains("period") && !label.contains("month") {
        return None;
    }
    let start = value
        .split(" - ")
        .next()
        .and_then(|part| part.split(" to ").next())
        .unwrap_or(value)
        .trim();
    parse_inferred(start)
        .or_else(|| parse_month_label(start))
        .and_then(|date| first_of_month(date.year(), date.month()))
}

/// Blank rows, and rows whose first filled cell is a `Total` label and that
/// carry no product code. Product lines whose description mentions a total
/// are kept.
fn is_blank_or_total(row: &[String], product_idx: Option<usize>) -> bool {
    let Some(first) = row.iter().find(|cell| !cell.is_empty()) else {
        return true;
    };
    let has_product = product_idx
        .and_then(|idx| row.get(idx))
        .is_some_and(|code| !code.is_empty());
    !has_product && is_total_label(first)
}

fn is_total_label(cell: &str) -> bool {
    let label = cell.to_ascii_lowercase();
    let label = label.strip_prefix("grand ").unwrap_or(&label);
    label
        .strip_prefix("total")
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_ascii_alphanumeric()))
}

/// Body rows under the header; later duplicates of a header name are dropped.
fn body_frame(header: &[String], body: &[&Vec<String>]) -> Result<DataFrame> {
    let mut seen = std::collections::BTreeSet::new();
    let mut columns = Vec::new();
    for (idx, name) in header.iter().enumerate() {
        if name.is_empty() || !seen.insert(name.as_str()) {
            continue;
        }
        let values: Vec<Option<String>> = body
            .iter()
            .map(|row| row.get(idx).filter(|cell| !cell.is_empty()).cloned())
            .collect();
        columns.push(Column::new(name.as_str().into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

fn forward_fill(values: Vec<Option<String>>) -> Vec<Option<String>> {
    let mut last = None;
    values
        .into_iter()
        .map(|value| {
            if value.is_some() {
                last.clone_from(&value);
            }
            value.or_else(|| last.clone())
        })
        .collect()
}
