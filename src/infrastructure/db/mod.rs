pub mod requisitions;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Result;
use crate::domain::requisition::Requisition;

/// Persistence collaborator that receives committed uploads
#[async_trait]
pub trait RequisitionSink {
    /// Store the whole batch or nothing; returns the number of rows written
    async fn insert_batch(&self, upload_id: Uuid, requisitions: &[Requisition]) -> Result<usize>;
}
