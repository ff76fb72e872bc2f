//! Shared utilities for salesprep crates.
//!
//! Polars `AnyValue` conversions, frame column helpers and the amount parser
//! used by every normalizer.

pub mod frame;
pub mod numeric;
pub mod polars;

pub use frame::{filter_rows, has_column, text_column, text_values};
pub use numeric::{InvalidAmount, parse_amount, safe_ratio};
pub use polars::{any_to_string, format_numeric};
