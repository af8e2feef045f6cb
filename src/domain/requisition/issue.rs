// ============================================================
// VALIDATION ISSUES
// ============================================================
// Structured failure records produced by the import pipeline

use serde::{Deserialize, Serialize};

/// Row number used for file-level issues
pub const FILE_ROW: usize = 0;

/// Row number of the header line
pub const HEADER_ROW: usize = 1;

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// File unreadable, undecodable or empty
    FileRead,

    /// One or more required headers absent
    MissingHeader,

    /// Required cell empty in a data row
    RequiredField,

    /// Non-empty cell failed its type check
    InvalidType,
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 1-based row number; header = 1, file-level = 0
    pub row: usize,

    pub field: String,

    pub message: String,

    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn file_read(message: impl Into<String>) -> Self {
        Self {
            row: FILE_ROW,
            field: "file".to_string(),
            message: message.into(),
            kind: IssueKind::FileRead,
        }
    }

    /// One issue listing every missing header
    pub fn missing_headers(missing: &[&str]) -> Self {
        Self {
            row: HEADER_ROW,
            field: "headers".to_string(),
            message: format!("Missing required headers: {}", missing.join(", ")),
            kind: IssueKind::MissingHeader,
        }
    }

    pub fn required_field(row: usize, field: &str, label: &str) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: format!("{} is required", label),
            kind: IssueKind::RequiredField,
        }
    }

    pub fn invalid_number(row: usize, field: &str, label: &str) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: format!("{} must be a number", label),
            kind: IssueKind::InvalidType,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {} ({}): {}", self.row, self.field, self.message)
    }
}
