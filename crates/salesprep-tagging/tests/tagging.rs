use polars::prelude::{Column, DataFrame, NamedFrom};
use salesprep_common::text_values;
use salesprep_model::fields;
use salesprep_tagging::{NhsPrivateTagger, PriceList, TaggingError, read_reference_table};

fn orders(customers: &[&str], codes: &[&str], descriptions: &[&str]) -> DataFrame {
    DataFrame::new(vec![
        Column::new(fields::ORDER_UUID.into(), vec!["u"; customers.len()]),
        Column::new(fields::CUSTOMER_NAME.into(), customers.to_vec()),
        Column::new(fields::PRACTICE_NAME.into(), vec!["High Street Dental"; customers.len()]),
        Column::new(fields::PRODUCT_CODE.into(), codes.to_vec()),
        Column::new(fields::PRODUCT_DESCRIPTION.into(), descriptions.to_vec()),
    ])
    .expect("frame")
}

fn ashford_prices() -> PriceList {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("price list.csv");
    std::fs::write(
        &path,
        "ProductID,Description,Price 2024,Class\nN1,Crown,40,NHS\nP1,Veneer,90,Private\nE1,Denture,20,Economy\n",
    )
    .expect("write");
    let table = read_reference_table(&path).expect("read");
    PriceList::from_table(&table, "ProductID", "Class").expect("price list")
}

#[test]
fn tags_follow_fixed_precedence() {
    let df = orders(
        &["Dr Smith", "WOODFORD Dental Services", "Dr Jones", "Dr Patel", "Dr Lee"],
        &["N1", "N1", "P1", "Z9", "E1"],
        &["Crown", "Crown", "Veneer RISIO", "Mystery", "Denture"],
    );
    let tagged = NhsPrivateTagger::builtin()
        .tag(&df, &ashford_prices())
        .expect("tag");

    assert_eq!(tagged.width(), df.width() + 1);
    assert_eq!(
        text_values(&tagged, fields::NHS_PRIVATE_TAG).expect("tags"),
        ["NHS", "ALS Lab", "Private", "Unknown", "NHS"]
    );
}

#[test]
fn input_frame_is_left_untouched() {
    let df = orders(&["Dr Smith"], &["N1"], &["Crown"]);
    let _ = NhsPrivateTagger::builtin()
        .tag(&df, &PriceList::new())
        .expect("tag");
    assert!(df.column(fields::NHS_PRIVATE_TAG).is_err());
}

#[test]
fn missing_product_code_is_an_error() {
    let df = DataFrame::new(vec![Column::new(
        fields::PRODUCT_DESCRIPTION.into(),
        vec!["Crown"],
    )])
    .expect("frame");
    let err = NhsPrivateTagger::builtin()
        .tag(&df, &PriceList::new())
        .expect_err("missing");
    assert!(matches!(err, TaggingError::MissingColumn { .. }));
}
