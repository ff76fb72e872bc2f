//! Canonical column names shared by every normalizer.
//!
//! Normalizers never emit vendor column names; the constants below are the
//! complete vocabulary of the two canonical shapes.

pub const ORDER_UUID: &str = "order_uuid";
pub const ORDER_INVOICED_DATE: &str = "order_invoiced_date";
pub const CUSTOMER_PRODUCT_CUBE_UUID: &str = "customer_product_cube_uuid";
pub const YEAR_MONTH: &str = "year_month";

pub const SYSTEM_SOURCE: &str = "system_source";
pub const ALS_LAB: &str = "als_lab";

pub const PRACTICE_CODE: &str = "practice_code";
pub const PRACTICE_NAME: &str = "practice_name";
pub const PRACTICE_ADDRESS_ROAD: &str = "practice_address_road";
pub const PRACTICE_ADDRESS_TOWN: &str = "practice_address_town";
pub const PRACTICE_ADDRESS_POSTCODE: &str = "practice_address_postcode";

pub const SHIP_ID: &str = "ship_id";
pub const SHIP_NAME: &str = "ship_name";
pub const SHIP_ADDRESS: &str = "ship_address";

pub const CUSTOMER_ID: &str = "customer_id";
pub const CUSTOMER_NAME: &str = "customer_name";

pub const PRODUCT_CODE: &str = "product_code";
pub const PRODUCT_DESCRIPTION: &str = "product_description";
pub const PRODUCT_CATEGORY: &str = "product_category";
pub const ORIGINAL_LAB_PRICE_BAND: &str = "original_lab_price_band";

pub const QUANTITY: &str = "quantity";
pub const NET_SALES: &str = "net_sales";
pub const TAX_SALES: &str = "tax_sales";
pub const UNIT_NET_PRICE: &str = "unit_net_price";
pub const NET_UNIT_PRICE: &str = "net_unit_price";
pub const DISCOUNTED_UNIT_PRICE: &str = "discounted_unit_price";

pub const NHS_OR_PRIVATE: &str = "nhs_or_private";
pub const ORDER_STATUS: &str = "order_status";
pub const CURRENCY_SYMBOL: &str = "currency_symbol";
pub const CURRENCY_DESCRIPTION: &str = "currency_description";

/// Column appended by the NHS/private tagger.
pub const NHS_PRIVATE_TAG: &str = "nhs_private_tag";

/// Columns of a mapping table produced by the price-list builders.
pub const NHS_OR_PRIVATE_MAPPING: &str = "nhs_or_private_mapping";
