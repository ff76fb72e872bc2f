use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use proptest::prelude::*;
use salesprep_common::text_values;
use salesprep_ingest::RawTable;
use salesprep_model::{CombinationBucket, fields};
use salesprep_transform::{
    LabPolicyTable, NormalizeError, Normalizer, REPORT_TOTALS_MARKER, YearlyExport,
    merge_yearly_exports,
};

fn raw(headers: &[&str], rows: &[Vec<String>]) -> DataFrame {
    RawTable::new(
        headers.iter().map(|h| (*h).to_string()).collect(),
        rows.to_vec(),
    )
    .to_frame()
    .expect("frame")
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_string()).collect()
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .expect("column")
        .f64()
        .expect("f64 column")
        .into_iter()
        .collect()
}

const TRANSACTOR: [&str; 15] = [
    "Year", "Month", "ShipID", "ShipFullName", "ShipAddress", "CustID", "CustFullName", "code",
    "Description", "PriceBand", "NetUnitPrice", "DiscountedUnitPrice", "Qty", "Net_Sales",
    "Tax_Sales",
];

/// One Transactor data row: (quantity, unit price).
fn transactor_rows(lines: &[(u32, f64)], totals_net_offset: f64) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = lines
        .iter()
        .enumerate()
        .map(|(idx, (qty, price))| {
            let net = f64::from(*qty) * price;
            row(&[
                "2024",
                "3",
                "",
                "Smile Dental",
                "",
                &format!("{}.0", 100 + idx),
                "",
                &format!("P{idx}"),
                "Crown",
                "Band A",
                &format!("{price:.2}"),
                &format!("{price:.2}"),
                &qty.to_string(),
                &format!("{net:.2}"),
                "0",
            ])
        })
        .collect();
    let qty: u32 = lines.iter().map(|(qty, _)| qty).sum();
    let net: f64 = lines.iter().map(|(qty, price)| f64::from(*qty) * price).sum();
    let mut totals = vec![String::new(); 15];
    totals[8] = REPORT_TOTALS_MARKER.to_string();
    totals[12] = qty.to_string();
    totals[13] = format!("{:.2}", net + totals_net_offset);
    totals[14] = "0".to_string();
    rows.push(totals);
    rows
}

#[test]
fn transactor_drops_only_the_totals_row() {
    let df = raw(&TRANSACTOR, &transactor_rows(&[(2, 10.0), (1, 5.5)], 0.0));
    let out = Normalizer::Transactor
        .normalize(&df, "Passion Dental", &LabPolicyTable::builtin())
        .expect("normalize");

    assert_eq!(out.height(), 2);
    assert_eq!(
        text_values(&out, fields::SHIP_ID).expect("ship"),
        vec!["0", "0"]
    );
    assert_eq!(
        text_values(&out, fields::SHIP_ADDRESS).expect("address"),
        vec!["Unknown", "Unknown"]
    );
    assert_eq!(
        text_values(&out, fields::CUSTOMER_ID).expect("customer"),
        vec!["100", "101"]
    );
    assert_eq!(
        text_values(&out, fields::YEAR_MONTH).expect("month"),
        vec!["2024-03-01", "2024-03-01"]
    );
    assert_eq!(
        text_values(&out, fields::SYSTEM_SOURCE).expect("source"),
        vec!["Transactor", "Transactor"]
    );
}

#[test]
fn transactor_totals_mismatch_is_a_reconciliation_error() {
    let df = raw(&TRANSACTOR, &transactor_rows(&[(2, 10.0), (1, 5.5)], 1.0));
    let err = Normalizer::Transactor
        .normalize(&df, "Passion Dental", &LabPolicyTable::builtin())
        .expect_err("mismatch");
    assert!(matches!(err, NormalizeError::TotalsMismatch { ref column, .. } if column == "Net_Sales"));
    assert!(err.is_reconciliation());
}

#[test]
fn transactor_without_totals_row_is_rejected() {
    let mut rows = transactor_rows(&[(1, 1.0)], 0.0);
    rows.pop();
    let df = raw(&TRANSACTOR, &rows);
    let err = Normalizer::Transactor
        .normalize(&df, "Lab", &LabPolicyTable::builtin())
        .expect_err("no totals");
    assert!(matches!(err, NormalizeError::MissingTotals { .. }));
}

#[test]
fn transactor_width_is_checked() {
    let headers = [
        "custID", "CustFullName", "shipid", "shipfullname", "code", "Description", "Qty",
        "Net_Sales", "Tax_Sales",
    ];
    let df = raw(&headers, &[row(&["1", "A", "2", "B", "C", "D", "1", "1", "0"])]);
    let err = Normalizer::Transactor
        .normalize(&df, "Lab", &LabPolicyTable::builtin())
        .expect_err("width");
    assert_eq!(
        err,
        NormalizeError::ColumnCount {
            expected: 15,
            found: 9
        }
    );
}

#[test]
fn passion_layout_fills_missing_fields() {
    let headers = [
        "Year", "Month", "shipid", "shipfullname", "custID", "CustFullName", "code", "Description",
        "Qty", "Net_Sales", "Tax_Sales",
    ];
    let rows = vec![
        row(&["2023", "November", "7", "", "", "Dr Who", "C1", "Denture", "3", "30", "0"]),
        row(&["", "", "", "", "", "", "", REPORT_TOTALS_MARKER, "3", "30", "0"]),
    ];
    let out = Normalizer::TransactorPassion
        .normalize(&raw(&headers, &rows), "Passion Dental Design", &LabPolicyTable::builtin())
        .expect("normalize");
    assert_eq!(out.height(), 1);
    assert_eq!(text_values(&out, fields::CUSTOMER_ID).expect("id"), vec!["Unknown"]);
    assert_eq!(text_values(&out, fields::SHIP_NAME).expect("ship"), vec!["Unknown"]);
    assert_eq!(
        text_values(&out, fields::ORIGINAL_LAB_PRICE_BAND).expect("band"),
        vec!["Unknown"]
    );
    assert_eq!(floats(&out, fields::NET_UNIT_PRICE), vec![None]);
    assert_eq!(text_values(&out, fields::YEAR_MONTH).expect("month"), vec!["2023-11-01"]);
}

#[test]
fn leca_unnamed_header_variant_uses_first_row() {
    let headers: Vec<String> = (0..12).map(|idx| format!("Unnamed: {idx}")).collect();
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    let rows = vec![
        row(&[
            "Year", "Month", "Practice", "Practice Name", "Account", "Dentist", "Code",
            "Description", "NHS", "Qty", "Amount", "VAT",
        ]),
        row(&[
            "2024", "1", "G52", "Leca Practice", "A1", "Dr A", "P1", "Crown", "NHS", "2", "120",
            "20",
        ]),
        row(&[
            "2024", "1", "G52", "Leca Practice", "A1", "Dr A", "P2", "Bridge", "Private", "0",
            "60", "10",
        ]),
    ];
    let out = Normalizer::Leca
        .normalize(&raw(&headers, &rows), "Leca Dental", &LabPolicyTable::builtin())
        .expect("normalize");
    assert_eq!(out.height(), 2);
    assert_eq!(floats(&out, fields::NET_SALES), vec![Some(100.0), Some(50.0)]);
    assert_eq!(floats(&out, fields::NET_UNIT_PRICE), vec![Some(50.0), None]);
    assert_eq!(
        text_values(&out, fields::SYSTEM_SOURCE).expect("source"),
        vec!["Custom", "Custom"]
    );
    assert_eq!(Normalizer::Leca.bucket(), CombinationBucket::Leca);
}

#[test]
fn leca_missing_vat_leaves_net_sales_empty() {
    let headers = [
        "Year", "Month", "Practice", "Practice Name", "Account", "Dentist", "Code", "Description",
        "NHS", "Qty", "Amount", "VAT",
    ];
    let rows = vec![
        row(&["2024", "2", "G52", "Leca Practice", "A1", "Dr A", "P1", "Crown", "NHS", "2", "120", ""]),
        row(&["2024", "2", "G52", "Leca Practice", "A1", "Dr A", "P2", "Bridge", "NHS", "1", "", "5"]),
        row(&["2024", "2", "G52", "Leca Practice", "A1", "Dr A", "P3", "Splint", "NHS", "1", "30", "0"]),
    ];
    let out = Normalizer::Leca
        .normalize(&raw(&headers, &rows), "Leca Dental", &LabPolicyTable::builtin())
        .expect("normalize");
    assert_eq!(floats(&out, fields::NET_SALES), vec![None, None, Some(30.0)]);
    assert_eq!(floats(&out, fields::NET_UNIT_PRICE), vec![None, None, Some(30.0)]);
}

#[test]
fn leca_with_wrong_width_is_rejected() {
    let df = raw(&["Year", "Month"], &[row(&["2024", "1"])]);
    let err = Normalizer::Leca
        .normalize(&df, "Leca", &LabPolicyTable::builtin())
        .expect_err("width");
    assert!(matches!(err, NormalizeError::ColumnCount { expected: 12, found: 2 }));
}

const LABTRAC_NEW: [&str; 13] = [
    "Date", "Delivery 1", "Delivery 2", "Delivery 3", "Delivery 5", "Code", "Name",
    "Product Link", "Description", "Category", "Qty", "Value", "Standard",
];

#[test]
fn labtrac_day_first_lab_drops_sentinel_rows() {
    let rows = vec![
        row(&[
            "05/02/2024", "Smile", "High St", "Leeds", "LS1 1AA", "12.0", "Dr B", "P1", "Crown",
            "Fixed", "2", "£1,000.00", "NHS",
        ]),
        row(&[
            "00/01/1900", "Smile", "High St", "Leeds", "LS1 1AA", "12", "Dr B", "P1", "Crown",
            "Fixed", "1", "10", "NHS",
        ]),
        row(&[
            "", "Smile", "High St", "Leeds", "LS1 1AA", "12", "Dr B", "P1", "Crown", "", "1",
            "10", "NHS",
        ]),
    ];
    let out = Normalizer::LabtracNew
        .normalize(&raw(&LABTRAC_NEW, &rows), "Romak Denture Centre", &LabPolicyTable::builtin())
        .expect("normalize");
    assert_eq!(out.height(), 1);
    assert_eq!(
        text_values(&out, fields::ORDER_INVOICED_DATE).expect("date"),
        vec!["2024-02-05"]
    );
    assert_eq!(text_values(&out, fields::CUSTOMER_ID).expect("id"), vec!["12"]);
    assert_eq!(floats(&out, fields::UNIT_NET_PRICE), vec![Some(500.0)]);
    assert!(out.column(fields::PRODUCT_CATEGORY).is_ok());
}

#[test]
fn labtrac_unparseable_date_names_the_row() {
    let rows = vec![
        row(&["2024-01-01", "", "", "", "", "1", "A", "P", "D", "", "1", "1", "NHS"]),
        row(&["soon", "", "", "", "", "1", "A", "P", "D", "", "1", "1", "NHS"]),
    ];
    let err = Normalizer::LabtracNew
        .normalize(&raw(&LABTRAC_NEW, &rows), "Lodge", &LabPolicyTable::builtin())
        .expect_err("date");
    assert_eq!(
        err,
        NormalizeError::InvalidDate {
            column: "Date".to_string(),
            row: 2,
            value: "soon".to_string()
        }
    );
}

#[test]
fn labtrac_drops_incomplete_category_column() {
    let rows = vec![
        row(&["2024-01-01", "", "", "", "", "1", "A", "P", "D", "Fixed", "1", "1", "NHS"]),
        row(&["2024-01-02", "", "", "", "", "1", "A", "P", "D", "", "1", "1", "NHS"]),
    ];
    let out = Normalizer::LabtracNew
        .normalize(&raw(&LABTRAC_NEW, &rows), "Lodge", &LabPolicyTable::builtin())
        .expect("normalize");
    assert!(out.column(fields::PRODUCT_CATEGORY).is_err());
}

#[test]
fn ashford_yearly_exports_merge_then_normalize() {
    let headers: Vec<String> = [
        "Invoice Date", "Delivery 1", "Delivery 2", "Delivery 3", "Delivery 5", "Code", "Name",
        "Product Link", "Description", "Qty", "Value", "Standard",
    ]
    .iter()
    .map(|h| (*h).to_string())
    .collect();
    let latest = RawTable::new(
        headers.clone(),
        vec![row(&["2023-05-01", "A", "", "", "", "1", "Dr", "P1", "Crown", "1", "50", "NHS"])],
    );
    let older = RawTable::new(
        row(&["2022-05-01", "A", "", "", "", "1", "Dr", "P1", "Crown", "1", "40", "NHS"]),
        vec![row(&["2022-06-01", "A", "", "", "", "1", "Dr", "P2", "Post", "2", "30", "Private"])],
    );
    let merged = merge_yearly_exports(vec![
        YearlyExport::new("ashford 2022.xlsx", older),
        YearlyExport::new("ashford 2023.xlsx", latest),
    ])
    .expect("merge");
    assert_eq!(merged.headers, headers);
    assert_eq!(merged.height(), 3);

    let out = Normalizer::LabtracAshford
        .normalize(
            &merged.to_frame().expect("frame"),
            "Ashford Dental Laboratory",
            &LabPolicyTable::builtin(),
        )
        .expect("normalize");
    assert_eq!(
        text_values(&out, fields::ORDER_INVOICED_DATE).expect("dates"),
        vec!["2022-05-01", "2022-06-01", "2023-05-01"]
    );
    assert!(Normalizer::LabtracAshford.merges_yearly_exports());
}

#[test]
fn evident_report_reads_month_from_heading() {
    let headers = ["Evident Sales Report", "", "", "", "", ""];
    let rows = vec![
        row(&["Report Period:", "01/03/2024 - 31/03/2024", "", "", "", ""]),
        row(&["", "", "", "", "", ""]),
        row(&["Customer Code", "Customer", "Product Code", "Product", "Quantity", "Net Value"]),
        row(&["C1", "Bright Smiles", "E100", "Crown", "2", "80"]),
        row(&["", "", "E200", "Veneer", "1", "40"]),
        row(&["", "Total", "", "", "3", "120"]),
        row(&["C2", "Dental Co", "E100", "Crown", "0", "0"]),
    ];
    let out = Normalizer::EvidentMonthly
        .normalize(&raw(&headers, &rows), "Densign", &LabPolicyTable::builtin())
        .expect("normalize");

    assert_eq!(out.height(), 3);
    assert_eq!(
        text_values(&out, fields::CUSTOMER_NAME).expect("customers"),
        vec!["Bright Smiles", "Bright Smiles", "Dental Co"]
    );
    assert_eq!(
        text_values(&out, fields::CUSTOMER_ID).expect("ids"),
        vec!["C1", "C1", "C2"]
    );
    assert_eq!(
        text_values(&out, fields::YEAR_MONTH).expect("month"),
        vec!["2024-03-01"; 3]
    );
    assert_eq!(floats(&out, fields::NET_UNIT_PRICE), vec![Some(40.0), Some(40.0), None]);
}

#[test]
fn evident_report_keeps_products_named_total() {
    let headers = ["Evident Sales Report", "", "", "", "", ""];
    let rows = vec![
        row(&["Month: March 2024", "", "", "", "", ""]),
        row(&["Customer Code", "Customer", "Product Code", "Product", "Quantity", "Net Value"]),
        row(&["C1", "Smile Co", "TD1", "Total upper denture", "1", "100"]),
        row(&["", "", "TD2", "Total lower denture", "1", "90"]),
        row(&["", "Total", "", "", "2", "190"]),
        row(&["Grand Total", "", "", "", "2", "190"]),
    ];
    let out = Normalizer::EvidentMonthly
        .normalize(&raw(&headers, &rows), "Densign", &LabPolicyTable::builtin())
        .expect("normalize");

    assert_eq!(
        text_values(&out, fields::PRODUCT_DESCRIPTION).expect("descriptions"),
        vec!["Total upper denture", "Total lower denture"]
    );
    assert_eq!(floats(&out, fields::NET_SALES), vec![Some(100.0), Some(90.0)]);
}

#[test]
fn evident_report_without_period_is_rejected() {
    let headers = ["Customer", "Product Code", "Product", "Quantity", "Net Value"];
    let err = Normalizer::EvidentMonthly
        .normalize(
            &raw(&headers, &[row(&["A", "E1", "Crown", "1", "1"])]),
            "Densign",
            &LabPolicyTable::builtin(),
        )
        .expect_err("no month");
    assert_eq!(err, NormalizeError::ReportMonthNotFound);
}

proptest! {
    #[test]
    fn transactor_rows_reconcile(
        lines in prop::collection::vec((1u32..50, 1u32..10_000), 1..20)
    ) {
        let lines: Vec<(u32, f64)> = lines
            .into_iter()
            .map(|(qty, cents)| (qty, f64::from(cents) / 100.0))
            .collect();
        let df = raw(&TRANSACTOR, &transactor_rows(&lines, 0.0));
        let out = Normalizer::Transactor
            .normalize(&df, "Lab", &LabPolicyTable::builtin())
            .expect("normalize");

        prop_assert_eq!(out.height(), lines.len());
        let ids = text_values(&out, fields::CUSTOMER_PRODUCT_CUBE_UUID).expect("ids");
        prop_assert!(ids.iter().all(|id| !id.is_empty()));
        prop_assert_eq!(ids.iter().collect::<BTreeSet<_>>().len(), ids.len());

        let net = floats(&out, fields::NET_SALES);
        let unit = floats(&out, fields::NET_UNIT_PRICE);
        let qty = floats(&out, fields::QUANTITY);
        for ((net, unit), qty) in net.iter().zip(&unit).zip(&qty) {
            let (net, unit, qty) = (net.expect("net"), unit.expect("unit"), qty.expect("qty"));
            prop_assert!((net - unit * qty).abs() <= 0.01 * qty);
        }
    }
}
