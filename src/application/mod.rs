pub mod use_cases;

pub use use_cases::bulk_import::{BulkImportUseCase, UploadedFile};
pub use use_cases::preview::{PreviewPage, UploadSummary};
