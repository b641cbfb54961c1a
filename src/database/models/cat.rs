use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Cat {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub breed: String,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields supplied when inserting a cat; the store generates the rest.
#[derive(Debug, Clone)]
pub struct NewCat {
    pub name: String,
    pub age: i64,
    pub breed: String,
    pub weight: f64,
}
