use crate::domain::error::{AppError, Result};
use crate::domain::requisition::{schema, Requisition, StoredRequisition};
use crate::infrastructure::db::RequisitionSink;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

const REQUISITIONS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS requisitions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    upload_id TEXT NOT NULL,
    position_title TEXT NOT NULL,
    position_category TEXT NOT NULL,
    location TEXT NOT NULL,
    job_description TEXT NOT NULL,
    number_of_positions INTEGER,
    min_experience TEXT NOT NULL,
    max_experience TEXT NOT NULL,
    min_salary TEXT NOT NULL,
    mid_salary TEXT NOT NULL,
    max_salary TEXT NOT NULL,
    mandatory_skills TEXT NOT NULL,
    optional_skills TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

pub struct SqliteRequisitionRepository {
    pool: SqlitePool,
}

impl SqliteRequisitionRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to parse connection string: {e}"))
            })?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        // Every connection to an in-memory database is a separate database
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {e}")))?;

        sqlx::query(REQUISITIONS_SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create table: {e}")))?;

        Ok(Self { pool })
    }

    /// Committed requisitions, newest first
    pub async fn list(&self, limit: i64) -> Result<Vec<StoredRequisition>> {
        sqlx::query_as::<_, RequisitionEntity>(
            "SELECT id, upload_id, position_title, position_category, location, job_description,
                    number_of_positions, min_experience, max_experience, min_salary, mid_salary,
                    max_salary, mandatory_skills, optional_skills, created_at
             FROM requisitions ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch requisitions: {e}")))
        .map(|entities| entities.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl RequisitionSink for SqliteRequisitionRepository {
    async fn insert_batch(&self, upload_id: Uuid, requisitions: &[Requisition]) -> Result<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {e}")))?;

        let upload_id = upload_id.to_string();
        let created_at = Utc::now();

        for requisition in requisitions {
            sqlx::query(
                "INSERT INTO requisitions (upload_id, position_title, position_category, location,
                    job_description, number_of_positions, min_experience, max_experience,
                    min_salary, mid_salary, max_salary, mandatory_skills, optional_skills, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&upload_id)
            .bind(&requisition.position_title)
            .bind(&requisition.position_category)
            .bind(&requisition.location)
            .bind(&requisition.job_description)
            .bind(requisition.number_of_positions)
            .bind(&requisition.min_experience)
            .bind(&requisition.max_experience)
            .bind(&requisition.min_salary)
            .bind(&requisition.mid_salary)
            .bind(&requisition.max_salary)
            .bind(join_skills(&requisition.mandatory_skills))
            .bind(join_skills(&requisition.optional_skills))
            .bind(created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert requisition: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit batch: {e}")))?;

        info!(upload_id = %upload_id, rows = requisitions.len(), "Requisition batch stored");
        Ok(requisitions.len())
    }
}

fn join_skills(skills: &[String]) -> String {
    skills.join(schema::SKILL_SEPARATOR.to_string().as_str())
}

// Internal entity for database mapping
#[derive(sqlx::FromRow)]
struct RequisitionEntity {
    id: i64,
    upload_id: String,
    position_title: String,
    position_category: String,
    location: String,
    job_description: String,
    number_of_positions: Option<i64>,
    min_experience: String,
    max_experience: String,
    min_salary: String,
    mid_salary: String,
    max_salary: String,
    mandatory_skills: String,
    optional_skills: String,
    created_at: DateTime<Utc>,
}

impl From<RequisitionEntity> for StoredRequisition {
    fn from(e: RequisitionEntity) -> Self {
        Self {
            id: e.id,
            upload_id: e.upload_id,
            requisition: Requisition {
                position_title: e.position_title,
                position_category: e.position_category,
                location: e.location,
                job_description: e.job_description,
                number_of_positions: e.number_of_positions,
                min_experience: e.min_experience,
                max_experience: e.max_experience,
                min_salary: e.min_salary,
                mid_salary: e.mid_salary,
                max_salary: e.max_salary,
                mandatory_skills: schema::split_skills(&e.mandatory_skills),
                optional_skills: schema::split_skills(&e.optional_skills),
            },
            created_at: e.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requisition(title: &str) -> Requisition {
        Requisition {
            position_title: title.to_string(),
            position_category: "Engineering".to_string(),
            location: "NYC".to_string(),
            job_description: String::new(),
            number_of_positions: Some(2),
            min_experience: "3".to_string(),
            max_experience: "5".to_string(),
            min_salary: String::new(),
            mid_salary: String::new(),
            max_salary: String::new(),
            mandatory_skills: vec!["Rust".to_string(), "SQL".to_string()],
            optional_skills: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_batch_and_list() {
        let repo = SqliteRequisitionRepository::connect("sqlite::memory:")
            .await
            .unwrap();
        let upload_id = Uuid::new_v4();

        let inserted = repo
            .insert_batch(upload_id, &[requisition("SWE"), requisition("SRE")])
            .await
            .unwrap();
        assert_eq!(inserted, 2);

        let stored = repo.list(10).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].requisition.position_title, "SRE");
        assert_eq!(stored[1].requisition, requisition("SWE"));
        assert_eq!(stored[0].upload_id, upload_id.to_string());
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let repo = SqliteRequisitionRepository::connect("sqlite::memory:")
            .await
            .unwrap();
        let batch: Vec<_> = (0..5).map(|i| requisition(&format!("R{i}"))).collect();
        repo.insert_batch(Uuid::new_v4(), &batch).await.unwrap();

        assert_eq!(repo.list(3).await.unwrap().len(), 3);
    }
}
