//! Plain-text triage reports for operators.

use std::fmt::Write as _;
use std::path::PathBuf;

use salesprep_model::ProvisionalSchema;

/// Lists each provisional schema with its columns, in minting order.
pub fn render_provisional_report(schemas: &[ProvisionalSchema]) -> String {
    let mut out = String::new();
    for schema in schemas {
        let _ = writeln!(out, "{} ({} columns)", schema.id, schema.columns.len());
        for column in &schema.columns {
            let _ = writeln!(out, "  - {column}");
        }
    }
    out
}

/// One path per line.
pub fn render_path_list(paths: &[PathBuf]) -> String {
    let mut out = String::new();
    for path in paths {
        let _ = writeln!(out, "{}", path.display());
    }
    out
}
