use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Treatment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Visit {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub motif: String,
    pub veterinaire: String,
    /// Cleared when the cat is deleted
    pub cat_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewVisit {
    pub date: DateTime<Utc>,
    pub motif: String,
    pub veterinaire: String,
    pub cat_id: i64,
}

/// A visit together with the treatments administered during it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitWithTreatments {
    #[serde(flatten)]
    pub visit: Visit,
    pub treatments: Vec<Treatment>,
}
