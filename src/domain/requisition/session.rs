// ============================================================
// UPLOAD SESSION
// ============================================================
// Result of one pipeline run and the commit gate around it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::issue::ValidationIssue;
use super::record::ParsedRecord;
use crate::domain::error::{AppError, Result};

/// Output of one tokenize -> map -> validate -> assemble pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Processed rows, capped at `row_limit`
    pub records: Vec<ParsedRecord>,

    /// Every issue in detection order
    pub issues: Vec<ValidationIssue>,

    /// Data lines found in the file, before the cap
    pub total_data_rows: usize,

    pub row_limit: usize,
}

impl ImportReport {
    /// Report for input that never reached the header mapper
    pub fn file_failure(issue: ValidationIssue, row_limit: usize) -> Self {
        Self {
            records: Vec::new(),
            issues: vec![issue],
            total_data_rows: 0,
            row_limit,
        }
    }

    /// Data rows skipped because of the row cap
    pub fn truncated_rows(&self) -> usize {
        self.total_data_rows.saturating_sub(self.records.len())
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Metadata of the uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub content_type: Option<String>,
    pub size_bytes: u64,

    /// Hex SHA-256 of the raw bytes
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitState {
    Reviewing,
    Committed {
        committed_at: DateTime<Utc>,
        inserted: usize,
    },
}

/// Transient aggregate of one upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSession {
    pub id: Uuid,
    pub source: SourceFile,
    pub report: ImportReport,
    pub state: CommitState,
    pub created_at: DateTime<Utc>,
}

impl UploadSession {
    pub fn new(source: SourceFile, report: ImportReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            report,
            state: CommitState::Reviewing,
            created_at: Utc::now(),
        }
    }

    /// Commit is only offered while reviewing a report with zero issues
    pub fn can_commit(&self) -> bool {
        self.state == CommitState::Reviewing && self.report.is_clean()
    }

    pub fn is_committed(&self) -> bool {
        matches!(self.state, CommitState::Committed { .. })
    }

    /// Check the gate without changing state
    pub fn ensure_committable(&self) -> Result<()> {
        if self.is_committed() {
            return Err(AppError::CommitRejected(format!(
                "upload {} is already committed",
                self.id
            )));
        }
        if !self.report.is_clean() {
            return Err(AppError::CommitRejected(format!(
                "upload {} has {} unresolved issue(s)",
                self.id,
                self.report.issues.len()
            )));
        }
        Ok(())
    }

    /// Reviewing -> Committed
    pub fn into_committed(self, inserted: usize) -> Result<Self> {
        self.ensure_committable()?;
        Ok(Self {
            state: CommitState::Committed {
                committed_at: Utc::now(),
                inserted,
            },
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SourceFile {
        SourceFile {
            name: "requisitions.csv".to_string(),
            content_type: Some("text/csv".to_string()),
            size_bytes: 10,
            sha256: "00".to_string(),
        }
    }

    fn report(issues: Vec<ValidationIssue>) -> ImportReport {
        ImportReport {
            records: Vec::new(),
            issues,
            total_data_rows: 0,
            row_limit: 100,
        }
    }

    #[test]
    fn test_clean_session_commits() {
        let session = UploadSession::new(source(), report(Vec::new()));
        assert!(session.can_commit());

        let committed = session.into_committed(3).unwrap();
        assert!(committed.is_committed());
        assert!(!committed.can_commit());
        assert!(matches!(committed.state, CommitState::Committed { inserted: 3, .. }));
    }

    #[test]
    fn test_session_with_issues_is_refused() {
        let issue = ValidationIssue::required_field(2, "location", "Location");
        let session = UploadSession::new(source(), report(vec![issue]));
        assert!(!session.can_commit());

        let err = session.into_committed(0).unwrap_err();
        assert!(matches!(err, AppError::CommitRejected(msg) if msg.contains("1 unresolved")));
    }

    #[test]
    fn test_second_commit_is_refused() {
        let session = UploadSession::new(source(), report(Vec::new()))
            .into_committed(1)
            .unwrap();
        assert!(session.into_committed(1).is_err());
    }

    #[test]
    fn test_truncated_rows() {
        let mut r = report(Vec::new());
        r.total_data_rows = 150;
        assert_eq!(r.truncated_rows(), 150);
    }
}
