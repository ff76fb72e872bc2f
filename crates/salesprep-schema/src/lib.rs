//! Schema registry and classification.
//!
//! A table's layout is identified by its set of column names, or by the
//! folder it sits in for the two location-classified labs. Signatures that
//! match nothing get a provisional id for operator review and are never
//! dispatched.

pub mod builtin;
pub mod classifier;
pub mod error;
pub mod registry;
pub mod report;

pub use classifier::{Assignment, Classification, ClassifierSession};
pub use error::{Result, SchemaError};
pub use registry::{RegistryEntry, SchemaMatcher, SchemaRegistry};
pub use report::{render_path_list, render_provisional_report};
