use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ids::SchemaId;
use crate::shape::CombinationBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Header contains the same column name more than once.
    DuplicateColumns,
    /// Workbook could not be opened or one of its sheets could not be read.
    Workbook,
    /// File could not be read or decoded.
    Read,
    /// File sits directly under the raw root, outside any lab folder.
    NoLabFolder,
    /// Schema id has no dispatch entry (includes provisional ids).
    NoNormalizer,
    /// Internal cross-check failed while normalizing.
    Reconciliation,
    /// Tagging failed for a normalized table.
    Tagging,
    /// Output could not be written.
    Write,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateColumns => "duplicate_columns",
            Self::Workbook => "workbook",
            Self::Read => "read",
            Self::NoLabFolder => "no_lab_folder",
            Self::NoNormalizer => "no_normalizer",
            Self::Reconciliation => "reconciliation",
            Self::Tagging => "tagging",
            Self::Write => "write",
        }
    }
}

/// A file-level problem. Never aborts the run on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileIssue {
    pub path: PathBuf,
    /// Sheet name for workbook tables.
    pub sheet: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

/// Side-table row: which schema a table was classified as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedTable {
    pub path: PathBuf,
    pub sheet: Option<String>,
    pub lab: String,
    pub schema: SchemaId,
}

/// A signature that matched nothing in the registry during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionalSchema {
    pub id: SchemaId,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedOutput {
    pub source: PathBuf,
    pub sheet: Option<String>,
    pub schema: SchemaId,
    pub normalizer: String,
    pub bucket: CombinationBucket,
    pub output: PathBuf,
    pub rows: usize,
    pub tagged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedOutput {
    pub bucket: CombinationBucket,
    pub output: PathBuf,
    pub files: usize,
    pub rows: usize,
}

/// Machine-readable summary of one run, written as `run_report.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub raw_root: Option<PathBuf>,
    pub classified: Vec<ClassifiedTable>,
    pub provisional: Vec<ProvisionalSchema>,
    pub outputs: Vec<NormalizedOutput>,
    pub combined: Vec<CombinedOutput>,
    pub issues: Vec<FileIssue>,
}

impl RunReport {
    pub fn issue_count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &FileIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    pub fn normalized_rows(&self) -> usize {
        self.outputs.iter().map(|output| output.rows).sum()
    }
}
