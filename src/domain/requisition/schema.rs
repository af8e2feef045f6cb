// ============================================================
// REQUISITION SCHEMA
// ============================================================
// One declarative table drives header mapping, row validation,
// template generation and typed conversion

use serde::{Deserialize, Serialize};

/// Primitive type expected in a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, stored as-is
    Text,

    /// Whole number; non-empty values must parse
    Integer,

    /// `;`-separated list of skills
    SkillList,
}

/// One column of the bulk upload file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name as it appears in the header row
    pub name: &'static str,

    /// Human label used in issue messages
    pub label: &'static str,

    pub kind: FieldKind,

    /// Header must be present in the file
    pub required_header: bool,

    /// Cell must be non-empty in every data row
    pub required_value: bool,

    /// Value used in the downloadable template's example row
    pub example: &'static str,
}

pub const POSITION_TITLE: &str = "position_title";
pub const POSITION_CATEGORY: &str = "position_category";
pub const LOCATION: &str = "location";
pub const JOB_DESCRIPTION: &str = "job_description";
pub const NUMBER_OF_POSITIONS: &str = "number_of_positions";
pub const MIN_EXPERIENCE: &str = "min_experience";
pub const MAX_EXPERIENCE: &str = "max_experience";
pub const MIN_SALARY: &str = "min_salary";
pub const MID_SALARY: &str = "mid_salary";
pub const MAX_SALARY: &str = "max_salary";
pub const MANDATORY_SKILLS: &str = "mandatory_skills";
pub const OPTIONAL_SKILLS: &str = "optional_skills";

/// Separator inside skill list cells
pub const SKILL_SEPARATOR: char = ';';

// Experience and salary columns are carried as text: no ordering or range
// rules exist for them yet.
const FIELDS: [FieldSpec; 12] = [
    FieldSpec {
        name: POSITION_TITLE,
        label: "Position title",
        kind: FieldKind::Text,
        required_header: true,
        required_value: true,
        example: "Software Engineer",
    },
    FieldSpec {
        name: POSITION_CATEGORY,
        label: "Position category",
        kind: FieldKind::Text,
        required_header: true,
        required_value: true,
        example: "Engineering",
    },
    FieldSpec {
        name: LOCATION,
        label: "Location",
        kind: FieldKind::Text,
        required_header: true,
        required_value: true,
        example: "Bangalore",
    },
    FieldSpec {
        name: JOB_DESCRIPTION,
        label: "Job description",
        kind: FieldKind::Text,
        required_header: false,
        required_value: false,
        example: "Develop and maintain web applications",
    },
    FieldSpec {
        name: NUMBER_OF_POSITIONS,
        label: "Number of positions",
        kind: FieldKind::Integer,
        required_header: true,
        required_value: false,
        example: "2",
    },
    FieldSpec {
        name: MIN_EXPERIENCE,
        label: "Minimum experience",
        kind: FieldKind::Text,
        required_header: false,
        required_value: false,
        example: "3",
    },
    FieldSpec {
        name: MAX_EXPERIENCE,
        label: "Maximum experience",
        kind: FieldKind::Text,
        required_header: false,
        required_value: false,
        example: "5",
    },
    FieldSpec {
        name: MIN_SALARY,
        label: "Minimum salary",
        kind: FieldKind::Text,
        required_header: false,
        required_value: false,
        example: "1200000",
    },
    FieldSpec {
        name: MID_SALARY,
        label: "Mid salary",
        kind: FieldKind::Text,
        required_header: false,
        required_value: false,
        example: "1500000",
    },
    FieldSpec {
        name: MAX_SALARY,
        label: "Maximum salary",
        kind: FieldKind::Text,
        required_header: false,
        required_value: false,
        example: "1800000",
    },
    FieldSpec {
        name: MANDATORY_SKILLS,
        label: "Mandatory skills",
        kind: FieldKind::SkillList,
        required_header: false,
        required_value: false,
        example: "JavaScript;React;Node.js",
    },
    FieldSpec {
        name: OPTIONAL_SKILLS,
        label: "Optional skills",
        kind: FieldKind::SkillList,
        required_header: false,
        required_value: false,
        example: "TypeScript;AWS",
    },
];

/// The requisition upload schema
pub struct RequisitionSchema;

impl RequisitionSchema {
    /// All fields in template column order
    pub fn fields() -> &'static [FieldSpec] {
        &FIELDS
    }

    pub fn field(name: &str) -> Option<&'static FieldSpec> {
        FIELDS.iter().find(|f| f.name == name)
    }

    /// Fields whose header must be present, in schema order
    pub fn required_headers() -> impl Iterator<Item = &'static FieldSpec> {
        FIELDS.iter().filter(|f| f.required_header)
    }

    /// Field names in template column order
    pub fn header_names() -> Vec<&'static str> {
        FIELDS.iter().map(|f| f.name).collect()
    }
}

/// Split a skill list cell into trimmed, non-empty entries
pub fn split_skills(value: &str) -> Vec<String> {
    value
        .split(SKILL_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
