pub mod error;

// Bulk requisition import
pub mod requisition;
