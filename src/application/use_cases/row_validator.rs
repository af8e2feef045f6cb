use crate::domain::requisition::{
    FieldKind, FieldMap, ParsedRecord, RawRow, RequisitionSchema, ValidationIssue, HEADER_ROW,
};

/// Records and issues produced from the data rows of one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowValidation {
    pub records: Vec<ParsedRecord>,
    pub issues: Vec<ValidationIssue>,
}

/// Check one record against the schema, in schema field order.
/// A required field with no column in `field_map` is left to the
/// header issue and is not reported again per row.
pub fn validate_record(record: &ParsedRecord, field_map: &FieldMap) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for spec in RequisitionSchema::fields() {
        let value = record.get(spec.name).trim();

        if value.is_empty() {
            if spec.required_value && field_map.contains(spec.name) {
                issues.push(ValidationIssue::required_field(
                    record.row, spec.name, spec.label,
                ));
            }
            continue;
        }

        if spec.kind == FieldKind::Integer && value.parse::<i64>().is_err() {
            issues.push(ValidationIssue::invalid_number(
                record.row, spec.name, spec.label,
            ));
        }
    }

    issues
}

/// Map and validate up to `row_limit` data rows.
/// A bad row never stops later rows from being checked.
pub fn validate_rows(rows: &[RawRow], field_map: &FieldMap, row_limit: usize) -> RowValidation {
    let mut result = RowValidation::default();

    for (index, cells) in rows.iter().take(row_limit).enumerate() {
        let record = ParsedRecord::from_cells(HEADER_ROW + 1 + index, cells, field_map);
        result.issues.extend(validate_record(&record, field_map));
        result.records.push(record);
    }

    result
}
