pub mod bulk_import;
pub mod header_mapper;
pub mod preview;
pub mod row_validator;
pub mod template;
