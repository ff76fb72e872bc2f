//! Mapping tables built from lab price lists.
//!
//! Output columns: `product_code`, `product_description`,
//! `nhs_or_private_mapping`.

use polars::prelude::{Column, DataFrame, NamedFrom};
use salesprep_ingest::RawTable;
use salesprep_model::{NhsPrivateTag, fields};
use tracing::debug;

use crate::error::Result;
use crate::source::column_index;

/// Data rows of the Woodford price sheet holding products.
pub const WOODFORD_ROWS: std::ops::Range<usize> = 8..789;

const WOODFORD_CLASS: &str = "Product Price List 1 - Default";
const WOODFORD_CODE: &str = "Unnamed: 1";
const WOODFORD_DESCRIPTION: &str = "Unnamed: 5";

#[derive(Debug, Default)]
struct MappingRows {
    codes: Vec<Option<String>>,
    descriptions: Vec<Option<String>>,
    classes: Vec<Option<String>>,
}

impl MappingRows {
    fn push(&mut self, code: &str, description: &str, class: &str) {
        self.codes.push(trimmed(code));
        self.descriptions.push(trimmed(description));
        self.classes.push(trimmed(class));
    }

    fn into_frame(self) -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Column::new(fields::PRODUCT_CODE.into(), self.codes),
            Column::new(fields::PRODUCT_DESCRIPTION.into(), self.descriptions),
            Column::new(fields::NHS_OR_PRIVATE_MAPPING.into(), self.classes),
        ])?)
    }
}

fn trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Aesthetic World: separate NHS and private code lists with `ProductID`,
/// `Description`, `Standard` and `Price1` columns. `Economy` is the NHS band.
pub fn aesthetic_world_mapping(nhs_codes: &RawTable, private_codes: &RawTable) -> Result<DataFrame> {
    let mut rows = MappingRows::default();
    for table in [nhs_codes, private_codes] {
        let code = column_index(table, "ProductID")?;
        let description = column_index(table, "Description")?;
        let standard = column_index(table, "Standard")?;
        for row in &table.rows {
            let class = row[standard].trim();
            let class = if class == "Economy" {
                NhsPrivateTag::Nhs.as_str()
            } else {
                class
            };
            rows.push(&row[code], &row[description], class);
        }
    }
    debug!(rows = rows.codes.len(), "built aesthetic world mapping");
    rows.into_frame()
}

/// Woodford: one price sheet where the products sit in [`WOODFORD_ROWS`]
/// under blank headers.
pub fn woodford_mapping(price_sheet: &RawTable) -> Result<DataFrame> {
    let class = column_index(price_sheet, WOODFORD_CLASS)?;
    let code = column_index(price_sheet, WOODFORD_CODE)?;
    let description = column_index(price_sheet, WOODFORD_DESCRIPTION)?;
    let end = WOODFORD_ROWS.end.min(price_sheet.height());
    let start = WOODFORD_ROWS.start.min(end);

    let mut rows = MappingRows::default();
    for row in &price_sheet.rows[start..end] {
        if row[code].trim().is_empty() && row[description].trim().is_empty() {
            continue;
        }
        rows.push(&row[code], &row[description], &row[class]);
    }
    debug!(rows = rows.codes.len(), "built woodford mapping");
    rows.into_frame()
}

#[cfg(test)]
mod tests {
    use salesprep_common::text_values;

    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| (*h).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn aesthetic_world_folds_economy_and_drops_price() {
        let headers = ["ProductID", "Description", "Standard", "Price1"];
        let nhs = table(&headers, &[&[" AW1 ", "Crown ", "Economy", "10"]]);
        let private = table(&headers, &[&["AW2", "Veneer", " Private", "80"]]);
        let mapping = aesthetic_world_mapping(&nhs, &private).expect("mapping");

        assert_eq!(mapping.width(), 3);
        assert_eq!(text_values(&mapping, fields::PRODUCT_CODE).expect("codes"), ["AW1", "AW2"]);
        assert_eq!(
            text_values(&mapping, fields::NHS_OR_PRIVATE_MAPPING).expect("classes"),
            ["NHS", "Private"]
        );
    }

    #[test]
    fn woodford_reads_the_product_window() {
        let mut grid: Vec<Vec<&str>> = vec![vec!["", "", "", "", "", ""]; 8];
        grid[0] = vec!["Customer:", "", "", "", "", ""];
        grid.push(vec![" NHS ", "W1", "", "", "", "Denture"]);
        grid.push(vec!["Private", "", "", "", "", ""]);
        grid.push(vec!["Private", "W2", "", "", "", " Crown "]);
        let rows: Vec<&[&str]> = grid.iter().map(Vec::as_slice).collect();
        let sheet = table(
            &["Product Price List 1 - Default", "", "", "", "", ""],
            &rows,
        );
        let mapping = woodford_mapping(&sheet).expect("mapping");

        assert_eq!(mapping.height(), 2);
        assert_eq!(text_values(&mapping, fields::PRODUCT_CODE).expect("codes"), ["W1", "W2"]);
        assert_eq!(
            text_values(&mapping, fields::PRODUCT_DESCRIPTION).expect("descriptions"),
            ["Denture", "Crown"]
        );
        assert_eq!(
            text_values(&mapping, fields::NHS_OR_PRIVATE_MAPPING).expect("classes"),
            ["NHS", "Private"]
        );
    }

    #[test]
    fn blank_spacer_row_does_not_shift_the_window() {
        let mut grid: Vec<Vec<&str>> = vec![vec!["", "", "", "", "", ""]; 8];
        grid[0] = vec!["Customer:", "", "", "", "", ""];
        grid[6] = vec!["Header", "Code", "", "", "", "Description"];
        grid[7] = vec!["Private", "OUT", "", "", "", "Above window"];
        grid.push(vec!["NHS", "W1", "", "", "", "Denture"]);
        let rows: Vec<&[&str]> = grid.iter().map(Vec::as_slice).collect();
        let sheet = table(
            &["Product Price List 1 - Default", "", "", "", "", ""],
            &rows,
        );
        let mapping = woodford_mapping(&sheet).expect("mapping");

        assert_eq!(text_values(&mapping, fields::PRODUCT_CODE).expect("codes"), ["W1"]);
    }

    #[test]
    fn short_woodford_sheet_yields_no_rows() {
        let sheet = table(&["Product Price List 1 - Default", "", "", "", "", ""], &[]);
        assert_eq!(woodford_mapping(&sheet).expect("mapping").height(), 0);
    }
}
