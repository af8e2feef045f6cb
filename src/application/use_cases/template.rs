use csv::WriterBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::requisition::RequisitionSchema;

pub const TEMPLATE_FILE_NAME: &str = "requisition_template.csv";

/// Downloadable CSV: schema header row plus one example row
pub fn requisition_template() -> Result<String> {
    let fields = RequisitionSchema::fields();
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    let write_err = |e: csv::Error| AppError::Internal(format!("Failed to write template: {}", e));
    writer
        .write_record(fields.iter().map(|f| f.name))
        .map_err(write_err)?;
    writer
        .write_record(fields.iter().map(|f| f.example))
        .map_err(write_err)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush template: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("Template is not UTF-8: {}", e)))
}
