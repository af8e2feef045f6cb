// ============================================================
// REQUISITION
// ============================================================
// Typed record handed to the persistence collaborator on commit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::ParsedRecord;
use super::schema::{self, split_skills};

/// A single open-position record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requisition {
    pub position_title: String,
    pub position_category: String,
    pub location: String,
    pub job_description: String,
    pub number_of_positions: Option<i64>,
    pub min_experience: String,
    pub max_experience: String,
    pub min_salary: String,
    pub mid_salary: String,
    pub max_salary: String,
    pub mandatory_skills: Vec<String>,
    pub optional_skills: Vec<String>,
}

impl From<&ParsedRecord> for Requisition {
    fn from(record: &ParsedRecord) -> Self {
        let text = |field: &str| record.get(field).to_string();

        Self {
            position_title: text(schema::POSITION_TITLE),
            position_category: text(schema::POSITION_CATEGORY),
            location: text(schema::LOCATION),
            job_description: text(schema::JOB_DESCRIPTION),
            number_of_positions: record.get(schema::NUMBER_OF_POSITIONS).trim().parse().ok(),
            min_experience: text(schema::MIN_EXPERIENCE),
            max_experience: text(schema::MAX_EXPERIENCE),
            min_salary: text(schema::MIN_SALARY),
            mid_salary: text(schema::MID_SALARY),
            max_salary: text(schema::MAX_SALARY),
            mandatory_skills: split_skills(record.get(schema::MANDATORY_SKILLS)),
            optional_skills: split_skills(record.get(schema::OPTIONAL_SKILLS)),
        }
    }
}

/// A committed requisition as read back from storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRequisition {
    pub id: i64,
    pub upload_id: String,
    pub requisition: Requisition,
    pub created_at: DateTime<Utc>,
}
