use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::not_found;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewVisit, Visit};
use crate::database::repository::VisitRepository;

const VISIT_COLUMNS: &str =
    "id, date, motif, veterinaire, cat_id, created_at, updated_at, deleted_at";

pub struct SqlVisitRepository {
    pool: SqlitePool,
}

impl SqlVisitRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for SqlVisitRepository {
    async fn create(&self, visit: NewVisit) -> Result<Visit, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO visits (date, motif, veterinaire, cat_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {VISIT_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Visit>(&sql)
            .bind(visit.date)
            .bind(&visit.motif)
            .bind(&visit.veterinaire)
            .bind(visit.cat_id)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Created visit {} for cat {}", created.id, visit.cat_id);
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Visit>, DatabaseError> {
        let sql = format!("SELECT {VISIT_COLUMNS} FROM visits WHERE deleted_at IS NULL ORDER BY id");
        Ok(sqlx::query_as::<_, Visit>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Visit, DatabaseError> {
        let sql = format!("SELECT {VISIT_COLUMNS} FROM visits WHERE id = ? AND deleted_at IS NULL");
        sqlx::query_as::<_, Visit>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("visit"))
    }

    async fn find_by_cat_id(&self, cat_id: i64) -> Result<Vec<Visit>, DatabaseError> {
        let sql = format!(
            "SELECT {VISIT_COLUMNS} FROM visits
             WHERE cat_id = ? AND deleted_at IS NULL
             ORDER BY date, id"
        );
        Ok(sqlx::query_as::<_, Visit>(&sql)
            .bind(cat_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update(&self, visit: &Visit) -> Result<Visit, DatabaseError> {
        let sql = format!(
            "UPDATE visits SET date = ?, motif = ?, veterinaire = ?, cat_id = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL
             RETURNING {VISIT_COLUMNS}"
        );

        sqlx::query_as::<_, Visit>(&sql)
            .bind(visit.date)
            .bind(&visit.motif)
            .bind(&visit.veterinaire)
            .bind(visit.cat_id)
            .bind(Utc::now())
            .bind(visit.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("visit"))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE visits SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("visit"));
        }

        let removed = sqlx::query("DELETE FROM treatments WHERE visit_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!("Deleted visit {} and {} treatments", id, removed.rows_affected());
        Ok(())
    }

    async fn filter_by_motif_or_veterinaire(
        &self,
        motif: &str,
        veterinaire: &str,
    ) -> Result<Vec<Visit>, DatabaseError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {VISIT_COLUMNS} FROM visits WHERE deleted_at IS NULL"
        ));

        if !motif.is_empty() {
            query.push(" AND motif = ").push_bind(motif);
        }
        if !veterinaire.is_empty() {
            query.push(" AND veterinaire = ").push_bind(veterinaire);
        }
        query.push(" ORDER BY id");

        Ok(query.build_query_as::<Visit>().fetch_all(&self.pool).await?)
    }
}
