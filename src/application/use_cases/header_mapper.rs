use crate::domain::requisition::{FieldMap, RequisitionSchema, ValidationIssue};

/// Header row bound onto the requisition schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMapping {
    pub field_map: FieldMap,

    /// Required header names absent from the file, in schema order
    pub missing: Vec<&'static str>,
}

impl HeaderMapping {
    /// The single batched issue for missing headers, if any
    pub fn issue(&self) -> Option<ValidationIssue> {
        if self.missing.is_empty() {
            None
        } else {
            Some(ValidationIssue::missing_headers(&self.missing))
        }
    }
}

/// Bind header cells to schema fields by position.
/// Unknown columns are dropped; a repeated header keeps its first column.
pub fn map_headers(header: &[String]) -> HeaderMapping {
    let mut field_map = FieldMap::new();
    for (column, cell) in header.iter().enumerate() {
        if let Some(spec) = RequisitionSchema::field(cell) {
            field_map.bind(spec.name, column);
        }
    }

    let missing = RequisitionSchema::required_headers()
        .filter(|spec| !field_map.contains(spec.name))
        .map(|spec| spec.name)
        .collect();

    HeaderMapping { field_map, missing }
}
