use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::not_found;
use crate::auth::password;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User};
use crate::database::repository::UserRepository;

const USER_COLUMNS: &str =
    "id, email, password, role, refresh_token, created_at, updated_at, deleted_at";

pub struct SqlUserRepository {
    pool: SqlitePool,
    bcrypt_cost: u32,
}

impl SqlUserRepository {
    pub fn new(pool: SqlitePool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let hashed = password::hash_password_async(user.password, self.bcrypt_cost).await?;

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (email, password, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        );

        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&hashed)
            .bind(user.role.as_str())
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created user {} with role {}", created.email, created.role);
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL ORDER BY id");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ? AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("user"))
    }

    async fn update(&self, user: &User) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET email = ?, password = ?, role = ?, refresh_token = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.role)
            .bind(&user.refresh_token)
            .bind(Utc::now())
            .bind(user.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("user"))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE users SET deleted_at = ?, updated_at = ?, refresh_token = NULL
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("user"));
        }
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                err @ sqlx::Error::RowNotFound => DatabaseError::NotFound(format!(
                    "user with email {} not found: {}",
                    email, err
                )),
                other => DatabaseError::Sqlx(other),
            })
    }

    async fn restore(&self, user: NewUser) -> Result<Option<User>, DatabaseError> {
        let hashed = password::hash_password_async(user.password, self.bcrypt_cost).await?;

        let sql = format!(
            "UPDATE users SET password = ?, role = ?, refresh_token = NULL, deleted_at = NULL, updated_at = ?
             WHERE email = ? AND deleted_at IS NOT NULL
             RETURNING {USER_COLUMNS}"
        );

        let restored = sqlx::query_as::<_, User>(&sql)
            .bind(&hashed)
            .bind(user.role.as_str())
            .bind(Utc::now())
            .bind(&user.email)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(user) = &restored {
            tracing::info!("Restored user {} with role {}", user.email, user.role);
        }
        Ok(restored)
    }
}
