//! Product code → NHS/private class lookups.

use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::DataFrame;
use salesprep_common::text_column;
use salesprep_ingest::RawTable;
use salesprep_model::{NhsPrivateTag, fields};
use tracing::debug;

use crate::error::{Result, TaggingError};
use crate::source::{column_index, read_reference_table};

/// Vendor price list reduced to the class of each product code.
///
/// Codes are trimmed. The first row for a code wins; rows whose class is not
/// an NHS or private label are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceList {
    classes: BTreeMap<String, NhsPrivateTag>,
}

impl PriceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &str, class: &str) {
        let code = code.trim();
        if code.is_empty() {
            return;
        }
        if let Some(tag) = NhsPrivateTag::from_price_class(class) {
            self.classes.entry(code.to_string()).or_insert(tag);
        }
    }

    pub fn from_table(table: &RawTable, code_column: &str, class_column: &str) -> Result<Self> {
        let code_idx = column_index(table, code_column)?;
        let class_idx = column_index(table, class_column)?;
        let mut list = Self::new();
        for row in &table.rows {
            list.insert(&row[code_idx], &row[class_idx]);
        }
        Ok(list)
    }

    /// Builds a list from a mapping table (`product_code`,
    /// `nhs_or_private_mapping`).
    pub fn from_mapping(mapping: &DataFrame) -> Result<Self> {
        let codes = column(mapping, fields::PRODUCT_CODE)?;
        let classes = column(mapping, fields::NHS_OR_PRIVATE_MAPPING)?;
        let mut list = Self::new();
        for (code, class) in codes.iter().zip(&classes) {
            if let (Some(code), Some(class)) = (code, class) {
                list.insert(code, class);
            }
        }
        Ok(list)
    }

    /// Loads a price-list file (CSV or the first workbook sheet).
    pub fn load(path: &Path, code_column: &str, class_column: &str) -> Result<Self> {
        let list = Self::from_table(&read_reference_table(path)?, code_column, class_column)?;
        debug!(path = %path.display(), codes = list.len(), "loaded price list");
        Ok(list)
    }

    pub fn class_of(&self, code: &str) -> Option<NhsPrivateTag> {
        self.classes.get(code.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if df.column(name).is_err() {
        return Err(TaggingError::missing(name));
    }
    Ok(text_column(df, name)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable::new(
            vec!["ProductID".into(), "Description".into(), "Price 2024".into(), "Class".into()],
            vec![
                vec!["101".into(), "Crown".into(), "50".into(), "NHS".into()],
                vec![" 102 ".into(), "Veneer".into(), "90".into(), "Private".into()],
                vec!["101".into(), "Crown".into(), "55".into(), "Private".into()],
                vec!["103".into(), "Model".into(), "5".into(), "".into()],
            ],
        )
    }

    #[test]
    fn first_class_per_code_wins() {
        let list = PriceList::from_table(&table(), "ProductID", "Class").expect("list");
        assert_eq!(list.len(), 2);
        assert_eq!(list.class_of("101"), Some(NhsPrivateTag::Nhs));
        assert_eq!(list.class_of("102 "), Some(NhsPrivateTag::Private));
        assert_eq!(list.class_of("103"), None);
    }

    #[test]
    fn missing_class_column_is_an_error() {
        let err = PriceList::from_table(&table(), "ProductID", "Band").expect_err("missing");
        assert!(matches!(err, TaggingError::MissingColumn { ref column } if column == "Band"));
    }
}
