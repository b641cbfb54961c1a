use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::not_found;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewTreatment, Treatment};
use crate::database::repository::TreatmentRepository;

const TREATMENT_COLUMNS: &str = "id, name, visit_id, created_at, updated_at, deleted_at";

pub struct SqlTreatmentRepository {
    pool: SqlitePool,
}

impl SqlTreatmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TreatmentRepository for SqlTreatmentRepository {
    async fn create(&self, treatment: NewTreatment) -> Result<Treatment, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO treatments (name, visit_id, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             RETURNING {TREATMENT_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, Treatment>(&sql)
            .bind(&treatment.name)
            .bind(treatment.visit_id)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_all(&self) -> Result<Vec<Treatment>, DatabaseError> {
        let sql =
            format!("SELECT {TREATMENT_COLUMNS} FROM treatments WHERE deleted_at IS NULL ORDER BY id");
        Ok(sqlx::query_as::<_, Treatment>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Treatment, DatabaseError> {
        let sql =
            format!("SELECT {TREATMENT_COLUMNS} FROM treatments WHERE id = ? AND deleted_at IS NULL");
        sqlx::query_as::<_, Treatment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("treatment"))
    }

    async fn update(&self, treatment: &Treatment) -> Result<Treatment, DatabaseError> {
        let sql = format!(
            "UPDATE treatments SET name = ?, visit_id = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL
             RETURNING {TREATMENT_COLUMNS}"
        );

        sqlx::query_as::<_, Treatment>(&sql)
            .bind(&treatment.name)
            .bind(treatment.visit_id)
            .bind(Utc::now())
            .bind(treatment.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("treatment"))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE treatments SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("treatment"));
        }
        Ok(())
    }

    async fn find_by_visit_id(&self, visit_id: i64) -> Result<Vec<Treatment>, DatabaseError> {
        let sql = format!(
            "SELECT {TREATMENT_COLUMNS} FROM treatments
             WHERE visit_id = ? AND deleted_at IS NULL
             ORDER BY id"
        );
        Ok(sqlx::query_as::<_, Treatment>(&sql)
            .bind(visit_id)
            .fetch_all(&self.pool)
            .await?)
    }
}
