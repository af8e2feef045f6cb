use std::sync::Arc;

use tracing::{error, info};

use crate::application::BulkImportUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::requisitions::SqliteRequisitionRepository;
use crate::interfaces::http::HttpState;

/// Open the database and build the shared request state
pub async fn setup(config: &AppConfig) -> Result<HttpState> {
    let repository = SqliteRequisitionRepository::connect(&config.database_url)
        .await
        .map_err(|err| {
            error!(error = %err, database_url = %config.database_url, "Failed to open requisition database");
            err
        })?;
    let repository = Arc::new(repository);

    let import = BulkImportUseCase::new(config.import.clone(), repository.clone())?;

    info!(
        row_limit = config.import.row_limit,
        tokenizer = ?config.import.tokenizer,
        max_file_bytes = config.import.max_file_bytes,
        "Bulk import ready"
    );

    Ok(HttpState {
        import: Arc::new(import),
        repository,
    })
}
