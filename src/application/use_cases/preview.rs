use serde::Serialize;
use uuid::Uuid;

use crate::domain::requisition::{
    CommitState, ImportReport, ParsedRecord, SourceFile, UploadSession, ValidationIssue,
};

/// Rows shown in the preview table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewPage {
    pub rows: Vec<ParsedRecord>,

    /// Processed rows not shown in the table
    pub remaining_rows: usize,

    /// e.g. "... and 95 more rows"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_label: Option<String>,
}

impl PreviewPage {
    pub fn from_report(report: &ImportReport, display_rows: usize) -> Self {
        let shown = report.records.len().min(display_rows);
        let remaining_rows = report.records.len() - shown;
        let remaining_label = match remaining_rows {
            0 => None,
            1 => Some("... and 1 more row".to_string()),
            n => Some(format!("... and {} more rows", n)),
        };

        Self {
            rows: report.records[..shown].to_vec(),
            remaining_rows,
            remaining_label,
        }
    }
}

/// What the review screen needs to render one upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub id: Uuid,
    pub source: SourceFile,
    pub state: CommitState,
    pub can_commit: bool,
    pub issue_count: usize,

    /// First issues in detection order
    pub issues: Vec<ValidationIssue>,
    pub processed_rows: usize,
    pub total_data_rows: usize,
    pub truncated_rows: usize,
    pub row_limit: usize,
    pub preview: PreviewPage,
}

impl UploadSummary {
    pub fn new(session: &UploadSession, display_rows: usize, listed_issues: usize) -> Self {
        let report = &session.report;
        Self {
            id: session.id,
            source: session.source.clone(),
            state: session.state.clone(),
            can_commit: session.can_commit(),
            issue_count: report.issues.len(),
            issues: report.issues.iter().take(listed_issues).cloned().collect(),
            processed_rows: report.records.len(),
            total_data_rows: report.total_data_rows,
            truncated_rows: report.truncated_rows(),
            row_limit: report.row_limit,
            preview: PreviewPage::from_report(report, display_rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::requisition::FieldMap;

    fn report(rows: usize) -> ImportReport {
        ImportReport {
            records: (0..rows)
                .map(|i| ParsedRecord::from_cells(i + 2, &[], &FieldMap::new()))
                .collect(),
            issues: Vec::new(),
            total_data_rows: rows,
            row_limit: 100,
        }
    }

    #[test]
    fn test_preview_slices_to_display_rows() {
        let page = PreviewPage::from_report(&report(100), 5);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.remaining_rows, 95);
        assert_eq!(page.remaining_label.as_deref(), Some("... and 95 more rows"));
        assert_eq!(page.rows[0].row, 2);
    }

    #[test]
    fn test_small_preview_has_no_label() {
        let page = PreviewPage::from_report(&report(3), 5);
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.remaining_rows, 0);
        assert!(page.remaining_label.is_none());
    }

    #[test]
    fn test_single_remaining_row() {
        let page = PreviewPage::from_report(&report(6), 5);
        assert_eq!(page.remaining_label.as_deref(), Some("... and 1 more row"));
    }

    #[test]
    fn test_summary_lists_first_issues() {
        let mut r = report(2);
        r.issues = (2..30)
            .map(|row| ValidationIssue::required_field(row, "location", "Location"))
            .collect();
        let source = SourceFile {
            name: "a.csv".to_string(),
            content_type: None,
            size_bytes: 1,
            sha256: String::new(),
        };
        let session = UploadSession::new(source, r);

        let summary = UploadSummary::new(&session, 5, 10);
        assert_eq!(summary.issue_count, 28);
        assert_eq!(summary.issues.len(), 10);
        assert!(!summary.can_commit);
    }
}
