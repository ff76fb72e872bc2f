//! NHS/private tagging of normalized rows.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame, NamedFrom};
use salesprep_common::{has_column, text_column};
use salesprep_model::{NhsPrivateTag, fields};
use tracing::info;

use crate::error::{Result, TaggingError};
use crate::labs::{
    InternalLab, RISIO_MARKER, builtin_internal_labs, builtin_search_terms, postcode_key,
};
use crate::price_list::PriceList;

/// The columns of one row the tagger looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowView<'a> {
    pub customer_name: Option<&'a str>,
    pub practice_name: Option<&'a str>,
    pub practice_postcode: Option<&'a str>,
    pub product_code: Option<&'a str>,
    pub product_description: Option<&'a str>,
}

/// Assigns one [`NhsPrivateTag`] per row.
///
/// Precedence: a RISIO product is private, then a sale to one of the group's
/// labs, then the price-list class, then unknown.
///
/// Group labs are recognised by name. Matching the practice postcode against
/// the labs' postcodes is opt-in through [`Self::with_postcode_match`]; many
/// practices share a postcode with a lab.
#[derive(Debug, Clone)]
pub struct NhsPrivateTagger {
    search_terms: Vec<String>,
    lab_postcodes: BTreeSet<String>,
    match_postcodes: bool,
    risio_marker: String,
}

impl NhsPrivateTagger {
    pub fn new(labs: &[InternalLab], search_terms: &[String], risio_marker: &str) -> Self {
        Self {
            search_terms: search_terms
                .iter()
                .map(|term| term.trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect(),
            lab_postcodes: labs
                .iter()
                .map(|lab| postcode_key(&lab.postcode))
                .filter(|key| !key.is_empty())
                .collect(),
            match_postcodes: false,
            risio_marker: risio_marker.to_string(),
        }
    }

    #[must_use]
    pub fn with_postcode_match(mut self, enabled: bool) -> Self {
        self.match_postcodes = enabled;
        self
    }

    pub fn builtin() -> Self {
        Self::new(&builtin_internal_labs(), &builtin_search_terms(), RISIO_MARKER)
    }

    /// True when either name contains a search term, or, with postcode
    /// matching on, the practice sits at a group lab's postcode.
    pub fn is_internal_lab(&self, row: &RowView<'_>) -> bool {
        let name_matches = [row.customer_name, row.practice_name]
            .into_iter()
            .flatten()
            .map(str::to_lowercase)
            .any(|name| self.search_terms.iter().any(|term| name.contains(term.as_str())));
        name_matches
            || (self.match_postcodes
                && row
                    .practice_postcode
                    .is_some_and(|postcode| self.lab_postcodes.contains(&postcode_key(postcode))))
    }

    pub fn tag_row(&self, row: &RowView<'_>, price_list: &PriceList) -> NhsPrivateTag {
        if row
            .product_description
            .is_some_and(|description| description.contains(&self.risio_marker))
        {
            return NhsPrivateTag::Private;
        }
        if self.is_internal_lab(row) {
            return NhsPrivateTag::AlsLab;
        }
        row.product_code
            .and_then(|code| price_list.class_of(code))
            .unwrap_or(NhsPrivateTag::Unknown)
    }

    /// A copy of `df` with an `nhs_private_tag` column appended.
    pub fn tag(&self, df: &DataFrame, price_list: &PriceList) -> Result<DataFrame> {
        let codes = required(df, fields::PRODUCT_CODE)?;
        let descriptions = required(df, fields::PRODUCT_DESCRIPTION)?;
        let customers = optional(df, fields::CUSTOMER_NAME)?;
        let practices = optional(df, fields::PRACTICE_NAME)?;
        let postcodes = optional(df, fields::PRACTICE_ADDRESS_POSTCODE)?;

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        let tags: Vec<&'static str> = (0..df.height())
            .map(|idx| {
                let row = RowView {
                    customer_name: customers[idx].as_deref(),
                    practice_name: practices[idx].as_deref(),
                    practice_postcode: postcodes[idx].as_deref(),
                    product_code: codes[idx].as_deref(),
                    product_description: descriptions[idx].as_deref(),
                };
                let tag = self.tag_row(&row, price_list).as_str();
                *counts.entry(tag).or_default() += 1;
                tag
            })
            .collect();

        let mut tagged = df.clone();
        tagged.with_column(Column::new(fields::NHS_PRIVATE_TAG.into(), tags))?;
        info!(rows = tagged.height(), tags = ?counts, "tagged rows");
        Ok(tagged)
    }
}

fn required(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if !has_column(df, name) {
        return Err(TaggingError::missing(name));
    }
    Ok(text_column(df, name)?)
}

fn optional(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if has_column(df, name) {
        Ok(text_column(df, name)?)
    } else {
        Ok(vec![None; df.height()])
    }
}
