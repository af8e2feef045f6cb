// ============================================================
// REQUISITION IMPORT DOMAIN LAYER
// ============================================================
// Core types and value objects for bulk requisition import
// No I/O, no async

mod import_config;
mod issue;
mod record;
#[allow(clippy::module_inception)]
mod requisition;
pub mod schema;
mod session;

pub use import_config::{ImportConfig, TokenizerMode};
pub use issue::{IssueKind, ValidationIssue, FILE_ROW, HEADER_ROW};
pub use record::{FieldMap, ParsedRecord, RawRow, TokenizedText};
pub use requisition::{Requisition, StoredRequisition};
pub use schema::{FieldKind, FieldSpec, RequisitionSchema};
pub use session::{CommitState, ImportReport, SourceFile, UploadSession};
