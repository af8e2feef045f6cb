// ============================================================
// BULK REQUISITION IMPORT USE CASE
// ============================================================
// Tokenize -> map headers -> validate rows -> assemble preview,
// then gate the commit on a clean report

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::header_mapper::map_headers;
use super::preview::UploadSummary;
use super::row_validator::validate_rows;
use crate::domain::error::{AppError, Result};
use crate::domain::requisition::{
    ImportConfig, ImportReport, Requisition, SourceFile, UploadSession, ValidationIssue,
};
use crate::infrastructure::csv::{decode_upload, tokenizer_for, RowTokenizer};
use crate::infrastructure::db::RequisitionSink;

static SUPPORTED_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(csv|xlsx?)$").unwrap());

const SUPPORTED_MIME_TYPES: [&str; 3] = [
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// A file as received from the client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Run the whole pipeline over already-decoded text.
/// Never fails: unreadable input becomes a single row-0 issue.
pub fn run_import(text: &str, tokenizer: &dyn RowTokenizer, row_limit: usize) -> ImportReport {
    let tokenized = match tokenizer.tokenize(text) {
        Ok(tokenized) => tokenized,
        Err(err) => {
            debug!(error = %err, "Tokenizer rejected upload text");
            return ImportReport::file_failure(file_issue(&err), row_limit);
        }
    };

    let mapping = map_headers(&tokenized.header);
    let validation = validate_rows(&tokenized.rows, &mapping.field_map, row_limit);

    let mut issues = Vec::with_capacity(validation.issues.len() + 1);
    issues.extend(mapping.issue());
    issues.extend(validation.issues);

    ImportReport {
        records: validation.records,
        issues,
        total_data_rows: tokenized.rows.len(),
        row_limit,
    }
}

fn file_issue(err: &AppError) -> ValidationIssue {
    match err {
        AppError::ParseError(msg) => ValidationIssue::file_read(msg.clone()),
        other => ValidationIssue::file_read(other.to_string()),
    }
}

/// Accept by extension or MIME type; content is not inspected here
pub fn is_supported_file(name: &str, content_type: Option<&str>) -> bool {
    let mime_ok = content_type
        .map(|ct| {
            let essence = ct.split(';').next().unwrap_or("").trim();
            SUPPORTED_MIME_TYPES
                .iter()
                .any(|m| m.eq_ignore_ascii_case(essence))
        })
        .unwrap_or(false);

    mime_ok || SUPPORTED_EXTENSION.is_match(name)
}

pub struct BulkImportUseCase {
    config: ImportConfig,
    tokenizer: Box<dyn RowTokenizer>,
    sink: Arc<dyn RequisitionSink + Send + Sync>,
    sessions: Mutex<HashMap<Uuid, UploadSession>>,
}

impl BulkImportUseCase {
    pub fn new(config: ImportConfig, sink: Arc<dyn RequisitionSink + Send + Sync>) -> Result<Self> {
        let tokenizer = tokenizer_for(&config)?;
        Ok(Self::with_tokenizer(config, tokenizer, sink))
    }

    pub fn with_tokenizer(
        config: ImportConfig,
        tokenizer: Box<dyn RowTokenizer>,
        sink: Arc<dyn RequisitionSink + Send + Sync>,
    ) -> Self {
        Self {
            config,
            tokenizer,
            sink,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Validate text without opening a session
    pub fn validate_text(&self, text: &str) -> ImportReport {
        run_import(text, self.tokenizer.as_ref(), self.config.row_limit)
    }

    /// Check, decode and validate a file, then open a review session for it
    pub fn upload(&self, file: UploadedFile) -> Result<UploadSession> {
        if !is_supported_file(&file.name, file.content_type.as_deref()) {
            return Err(AppError::ValidationError(format!(
                "Unsupported file type for {}: expected .csv, .xls or .xlsx",
                file.name
            )));
        }

        let size_bytes = file.bytes.len() as u64;
        if size_bytes > self.config.max_file_bytes {
            return Err(AppError::ValidationError(format!(
                "{} is {} bytes, limit is {} bytes",
                file.name, size_bytes, self.config.max_file_bytes
            )));
        }

        let report = match decode_upload(&file.bytes) {
            Ok(text) => self.validate_text(&text),
            Err(err) => ImportReport::file_failure(file_issue(&err), self.config.row_limit),
        };

        let source = SourceFile {
            sha256: hex::encode(Sha256::digest(&file.bytes)),
            name: file.name,
            content_type: file.content_type,
            size_bytes,
        };
        let session = UploadSession::new(source, report);

        info!(
            upload_id = %session.id,
            file = %session.source.name,
            rows = session.report.records.len(),
            truncated = session.report.truncated_rows(),
            issues = session.report.issues.len(),
            "Upload validated"
        );

        let mut sessions = self.lock_sessions();
        self.evict_sessions(&mut sessions);
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    pub fn session(&self, id: Uuid) -> Result<UploadSession> {
        self.lock_sessions()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("upload {}", id)))
    }

    pub fn summary(&self, session: &UploadSession) -> UploadSummary {
        UploadSummary::new(
            session,
            self.config.display_rows,
            self.config.listed_issues,
        )
    }

    /// Drop a session so a different file can be uploaded
    pub fn discard(&self, id: Uuid) -> Result<()> {
        self.lock_sessions()
            .remove(&id)
            .map(|_| info!(upload_id = %id, "Upload discarded"))
            .ok_or_else(|| AppError::NotFound(format!("upload {}", id)))
    }

    /// Hand every processed row to the sink, only when the upload has no issues
    pub async fn commit(&self, id: Uuid) -> Result<UploadSession> {
        // Taken out of the store while the sink runs so a concurrent commit sees NotFound
        let session = self
            .lock_sessions()
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("upload {}", id)))?;

        if let Err(err) = session.ensure_committable() {
            warn!(upload_id = %id, error = %err, "Commit refused");
            self.lock_sessions().insert(id, session);
            return Err(err);
        }

        let requisitions: Vec<Requisition> =
            session.report.records.iter().map(Requisition::from).collect();

        let inserted = match self.sink.insert_batch(id, &requisitions).await {
            Ok(inserted) => inserted,
            Err(err) => {
                warn!(upload_id = %id, error = %err, "Commit failed");
                self.lock_sessions().insert(id, session);
                return Err(err);
            }
        };

        let committed = session.into_committed(inserted)?;
        info!(upload_id = %id, inserted, "Upload committed");

        self.lock_sessions().insert(id, committed.clone());
        Ok(committed)
    }

    /// Drop sessions past their TTL, then the oldest ones until a new one fits
    fn evict_sessions(&self, sessions: &mut HashMap<Uuid, UploadSession>) {
        let before = sessions.len();
        let cutoff = Utc::now() - Duration::seconds(self.config.session_ttl_secs as i64);
        sessions.retain(|_, session| session.created_at > cutoff);

        while sessions.len() >= self.config.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|session| session.created_at)
                .map(|session| session.id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "Upload sessions evicted");
        }
    }

    // Every write leaves the map consistent, so a panic elsewhere while the
    // lock was held does not invalidate it
    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<Uuid, UploadSession>> {
        self.sessions.lock().unwrap_or_else(|poisoned| {
            warn!("Upload session store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
