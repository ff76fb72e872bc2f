//! Data model for the sales export normalization workspace.
//!
//! Everything here is plain data: canonical column names, the two canonical
//! shapes, schema identifiers, NHS/private tags and the run report.

pub mod error;
pub mod fields;
pub mod ids;
pub mod report;
pub mod shape;
pub mod tag;

pub use error::{ModelError, Result};
pub use ids::SchemaId;
pub use report::{
    ClassifiedTable, CombinedOutput, FileIssue, IssueKind, NormalizedOutput, ProvisionalSchema,
    RunReport,
};
pub use shape::{CanonicalShape, CombinationBucket};
pub use tag::NhsPrivateTag;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_report_counts_issues_by_kind() {
        let issue = |kind| FileIssue {
            path: "data/sales/leca/a.csv".into(),
            sheet: None,
            kind,
            message: "boom".to_string(),
        };
        let report = RunReport {
            issues: vec![
                issue(IssueKind::Reconciliation),
                issue(IssueKind::NoNormalizer),
                issue(IssueKind::Reconciliation),
            ],
            ..RunReport::default()
        };
        assert_eq!(report.issue_count(IssueKind::Reconciliation), 2);
        assert_eq!(report.issue_count(IssueKind::DuplicateColumns), 0);
        assert_eq!(report.issues_of(IssueKind::NoNormalizer).count(), 1);
    }

    #[test]
    fn run_report_serializes() {
        let report = RunReport {
            outputs: vec![NormalizedOutput {
                source: "data/sales/leca/a.csv".into(),
                sheet: None,
                schema: SchemaId::new("Schema_7").expect("schema id"),
                normalizer: "leca".to_string(),
                bucket: CombinationBucket::Leca,
                output: "out/leca/leca/a.csv".into(),
                rows: 3,
                tagged: false,
            }],
            ..RunReport::default()
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        assert!(json.contains("\"bucket\":\"leca\""));
        let round: RunReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round.normalized_rows(), 3);
    }
}
