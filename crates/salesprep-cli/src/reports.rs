//! Triage report files written after each run.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, PolarsResult};
use tracing::info;

use salesprep_ingest::write_csv_frame;
use salesprep_model::{FileIssue, IssueKind, RunReport};
use salesprep_schema::{render_path_list, render_provisional_report};

pub const FILE_SCHEMA_REPORT: &str = "file_schema.csv";
pub const PROVISIONAL_REPORT: &str = "provisional_schemas.txt";
pub const DUPLICATE_COLUMNS_REPORT: &str = "csv_with_duplicate_columns.txt";
pub const WORKBOOK_ERRORS_REPORT: &str = "error_excel_sheets_to_csv.txt";
pub const NO_NORMALIZER_REPORT: &str = "files_without_normalizer.txt";
pub const RECONCILIATION_REPORT: &str = "reconciliation_errors.txt";
pub const RUN_REPORT: &str = "run_report.json";

/// Side table of every classified table: path, sheet, lab and schema id.
pub fn file_schema_frame(report: &RunReport) -> PolarsResult<DataFrame> {
    let rows = &report.classified;
    DataFrame::new(vec![
        Column::new(
            "file_path".into(),
            rows.iter()
                .map(|row| row.path.display().to_string())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "sheet".into(),
            rows.iter().map(|row| row.sheet.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "lab".into(),
            rows.iter().map(|row| row.lab.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "schema".into(),
            rows.iter()
                .map(|row| row.schema.to_string())
                .collect::<Vec<_>>(),
        ),
    ])
}

/// Distinct paths of the issues of one kind, in first-seen order.
fn issue_paths(report: &RunReport, kind: IssueKind) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for issue in report.issues_of(kind) {
        if !paths.contains(&issue.path) {
            paths.push(issue.path.clone());
        }
    }
    paths
}

fn issue_line(issue: &FileIssue) -> String {
    match &issue.sheet {
        Some(sheet) => format!("{} [{sheet}]: {}", issue.path.display(), issue.message),
        None => format!("{}: {}", issue.path.display(), issue.message),
    }
}

/// One `path [sheet]: message` line per issue of `kind`.
pub fn render_issue_list(report: &RunReport, kind: IssueKind) -> String {
    let mut out = String::new();
    for issue in report.issues_of(kind) {
        let _ = writeln!(out, "{}", issue_line(issue));
    }
    out
}

fn write_text(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Writes every report file into `dir` and returns their paths.
///
/// Empty reports are still written so a rerun replaces stale content.
pub fn write_reports(report: &RunReport, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut written = Vec::new();

    let file_schema = dir.join(FILE_SCHEMA_REPORT);
    let frame = file_schema_frame(report).context("build file schema table")?;
    write_csv_frame(&frame, &file_schema)
        .with_context(|| format!("write {}", file_schema.display()))?;
    written.push(file_schema);

    written.push(write_text(
        dir,
        PROVISIONAL_REPORT,
        &render_provisional_report(&report.provisional),
    )?);
    written.push(write_text(
        dir,
        DUPLICATE_COLUMNS_REPORT,
        &render_path_list(&issue_paths(report, IssueKind::DuplicateColumns)),
    )?);
    written.push(write_text(
        dir,
        WORKBOOK_ERRORS_REPORT,
        &render_path_list(&issue_paths(report, IssueKind::Workbook)),
    )?);
    written.push(write_text(
        dir,
        NO_NORMALIZER_REPORT,
        &render_issue_list(report, IssueKind::NoNormalizer),
    )?);
    written.push(write_text(
        dir,
        RECONCILIATION_REPORT,
        &render_issue_list(report, IssueKind::Reconciliation),
    )?);

    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    written.push(write_text(dir, RUN_REPORT, &json)?);

    info!(dir = %dir.display(), files = written.len(), "wrote reports");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use salesprep_model::{ClassifiedTable, SchemaId};

    use super::*;

    fn sample_report() -> RunReport {
        RunReport {
            classified: vec![ClassifiedTable {
                path: PathBuf::from("raw/leca/sales.csv"),
                sheet: None,
                lab: "Leca Dental".to_string(),
                schema: SchemaId::known(7),
            }],
            issues: vec![
                FileIssue {
                    path: PathBuf::from("raw/x/a.xlsx"),
                    sheet: Some("2023".to_string()),
                    kind: IssueKind::NoNormalizer,
                    message: "no normalizer found for schema Unknown_Schema_1".to_string(),
                },
                FileIssue {
                    path: PathBuf::from("raw/x/b.csv"),
                    sheet: None,
                    kind: IssueKind::DuplicateColumns,
                    message: "duplicate column names: Net".to_string(),
                },
                FileIssue {
                    path: PathBuf::from("raw/x/b.csv"),
                    sheet: None,
                    kind: IssueKind::DuplicateColumns,
                    message: "duplicate column names: Qty".to_string(),
                },
            ],
            ..RunReport::default()
        }
    }

    #[test]
    fn issue_list_names_sheet() {
        let text = render_issue_list(&sample_report(), IssueKind::NoNormalizer);
        assert_eq!(
            text,
            "raw/x/a.xlsx [2023]: no normalizer found for schema Unknown_Schema_1\n"
        );
    }

    #[test]
    fn issue_paths_are_distinct() {
        let paths = issue_paths(&sample_report(), IssueKind::DuplicateColumns);
        assert_eq!(paths, vec![PathBuf::from("raw/x/b.csv")]);
    }

    #[test]
    fn writes_every_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let written = write_reports(&sample_report(), dir.path()).expect("write reports");
        assert_eq!(written.len(), 7);
        let schema_csv = fs::read_to_string(dir.path().join(FILE_SCHEMA_REPORT)).expect("read");
        assert!(schema_csv.starts_with("file_path,sheet,lab,schema"));
        assert!(schema_csv.contains("Schema_7"));
        let json = fs::read_to_string(dir.path().join(RUN_REPORT)).expect("read");
        let parsed: RunReport = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.issues.len(), 3);
    }
}
