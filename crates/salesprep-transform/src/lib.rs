//! Normalization of vendor sales tables into the canonical shapes.
//!
//! A [`DispatchTable`] routes each classified schema to a [`Normalizer`];
//! the normalizer consults the [`LabPolicyTable`] for lab-specific date
//! handling and returns a fresh canonical frame.

pub mod combine;
pub mod dates;
pub mod dispatch;
pub mod error;
mod frame;
pub mod normalizer;
mod normalizers;
pub mod policy;
pub mod repair;

pub use combine::combine_frames;
pub use dates::{DateStrategy, parse_inferred, parse_month_label};
pub use dispatch::DispatchTable;
pub use error::{DispatchError, NormalizeError, Result};
pub use normalizer::Normalizer;
pub use normalizers::totals::{REPORT_TOTALS_MARKER, TOTALS_TOLERANCE};
pub use policy::{CategoryRule, LabPolicy, LabPolicyTable};
pub use repair::{YearlyExport, export_year, merge_yearly_exports};
