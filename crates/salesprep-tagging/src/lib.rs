//! NHS/private tagging of normalized sales and the price-list mapping tables
//! it relies on.

pub mod error;
pub mod labs;
pub mod mapping;
pub mod price_list;
pub mod source;
pub mod tagger;

pub use error::{Result, TaggingError};
pub use labs::{InternalLab, RISIO_MARKER, builtin_internal_labs, builtin_search_terms};
pub use mapping::{WOODFORD_ROWS, aesthetic_world_mapping, woodford_mapping};
pub use price_list::PriceList;
pub use source::read_reference_table;
pub use tagger::{NhsPrivateTagger, RowView};
