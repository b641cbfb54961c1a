use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::not_found;
use crate::database::manager::DatabaseError;
use crate::database::models::{Cat, NewCat, Treatment, Visit, VisitWithTreatments};
use crate::database::repository::CatRepository;

const CAT_COLUMNS: &str = "id, name, age, breed, weight, created_at, updated_at, deleted_at";

pub struct SqlCatRepository {
    pool: SqlitePool,
}

impl SqlCatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatRepository for SqlCatRepository {
    async fn create(&self, cat: NewCat) -> Result<Cat, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO cats (name, age, breed, weight, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {CAT_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Cat>(&sql)
            .bind(&cat.name)
            .bind(cat.age)
            .bind(&cat.breed)
            .bind(cat.weight)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Created cat {} ({})", created.id, created.name);
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Cat>, DatabaseError> {
        let sql = format!("SELECT {CAT_COLUMNS} FROM cats WHERE deleted_at IS NULL ORDER BY id");
        Ok(sqlx::query_as::<_, Cat>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Cat, DatabaseError> {
        let sql = format!("SELECT {CAT_COLUMNS} FROM cats WHERE id = ? AND deleted_at IS NULL");
        sqlx::query_as::<_, Cat>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("cat"))
    }

    async fn update(&self, cat: &Cat) -> Result<Cat, DatabaseError> {
        let sql = format!(
            "UPDATE cats SET name = ?, age = ?, breed = ?, weight = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL
             RETURNING {CAT_COLUMNS}"
        );

        sqlx::query_as::<_, Cat>(&sql)
            .bind(&cat.name)
            .bind(cat.age)
            .bind(&cat.breed)
            .bind(cat.weight)
            .bind(Utc::now())
            .bind(cat.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("cat"))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE cats SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("cat"));
        }

        // Visits outlive their cat; only the reference goes away
        let detached = sqlx::query("UPDATE visits SET cat_id = NULL, updated_at = ? WHERE cat_id = ?")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!("Deleted cat {} and detached {} visits", id, detached.rows_affected());
        Ok(())
    }

    async fn cat_history(&self, cat_id: i64) -> Result<Vec<VisitWithTreatments>, DatabaseError> {
        let visits = sqlx::query_as::<_, Visit>(
            "SELECT id, date, motif, veterinaire, cat_id, created_at, updated_at, deleted_at
             FROM visits
             WHERE cat_id = ? AND deleted_at IS NULL
             ORDER BY date, id",
        )
        .bind(cat_id)
        .fetch_all(&self.pool)
        .await?;

        let treatments = sqlx::query_as::<_, Treatment>(
            "SELECT t.id, t.name, t.visit_id, t.created_at, t.updated_at, t.deleted_at
             FROM treatments t
             JOIN visits v ON v.id = t.visit_id
             WHERE v.cat_id = ? AND v.deleted_at IS NULL AND t.deleted_at IS NULL
             ORDER BY t.id",
        )
        .bind(cat_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_visit: HashMap<i64, Vec<Treatment>> = HashMap::new();
        for treatment in treatments {
            by_visit.entry(treatment.visit_id).or_default().push(treatment);
        }

        Ok(visits
            .into_iter()
            .map(|visit| {
                let treatments = by_visit.remove(&visit.id).unwrap_or_default();
                VisitWithTreatments { visit, treatments }
            })
            .collect())
    }
}
