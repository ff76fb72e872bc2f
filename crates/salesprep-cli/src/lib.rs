//! Library side of the `salesprep` command line: settings, logging, the
//! staged pipeline and the report writers.

pub mod logging;
pub mod mappings;
pub mod pipeline;
pub mod reports;
pub mod settings;
