// ============================================================
// ROW TYPES
// ============================================================
// Rows as they move from tokenizer to mapper to validator

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::schema::RequisitionSchema;

/// Cells of one input line, in column order
pub type RawRow = Vec<String>;

/// Tokenizer output: header line plus every data line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedText {
    pub header: RawRow,
    pub rows: Vec<RawRow>,
}

/// Recognized field name -> column index in the current file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    columns: HashMap<&'static str, usize>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a field to a column; the first binding wins
    pub fn bind(&mut self, field: &'static str, column: usize) {
        self.columns.entry(field).or_insert(column);
    }

    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One data row keyed by schema field name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// 1-based file row (first data row = 2)
    pub row: usize,

    pub values: BTreeMap<String, String>,
}

impl ParsedRecord {
    /// Read every schema field out of `cells`, defaulting to `""`
    pub fn from_cells(row: usize, cells: &[String], field_map: &FieldMap) -> Self {
        let values = RequisitionSchema::fields()
            .iter()
            .map(|spec| {
                let value = field_map
                    .column(spec.name)
                    .and_then(|idx| cells.get(idx))
                    .cloned()
                    .unwrap_or_default();
                (spec.name.to_string(), value)
            })
            .collect();

        Self { row, values }
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::requisition::schema::{LOCATION, POSITION_TITLE};

    #[test]
    fn test_field_map_first_binding_wins() {
        let mut map = FieldMap::new();
        map.bind(POSITION_TITLE, 0);
        map.bind(POSITION_TITLE, 3);
        assert_eq!(map.column(POSITION_TITLE), Some(0));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_short_row_defaults_to_empty() {
        let mut map = FieldMap::new();
        map.bind(POSITION_TITLE, 0);
        map.bind(LOCATION, 5);

        let record = ParsedRecord::from_cells(2, &["SWE".to_string()], &map);
        assert_eq!(record.get(POSITION_TITLE), "SWE");
        assert_eq!(record.get(LOCATION), "");
        assert_eq!(record.values.len(), RequisitionSchema::fields().len());
    }
}
