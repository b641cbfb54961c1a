//! Fixtures shared by the unit tests: in-memory stores, tokens, and a
//! repository that always fails.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::auth::Role;
use crate::config::AppConfig;
use crate::database::models::{
    Cat, NewCat, NewTreatment, NewUser, NewVisit, Treatment, User, Visit, VisitWithTreatments,
};
use crate::database::{
    CatRepository, DatabaseError, DatabaseManager, TreatmentRepository, UserRepository,
    VisitRepository,
};
use crate::state::AppState;

/// Development defaults with the cheapest bcrypt cost.
pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "SECURITY_BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .expect("test configuration is valid")
}

pub async fn test_state() -> AppState {
    let config = test_config();
    let db = DatabaseManager::connect(&config.database)
        .await
        .expect("in-memory database opens");
    AppState::new(db, &config)
}

/// Repositories over a private in-memory database.
pub struct TestStore {
    pub db: DatabaseManager,
    pub cats: Arc<dyn CatRepository>,
    pub visits: Arc<dyn VisitRepository>,
    pub treatments: Arc<dyn TreatmentRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl TestStore {
    pub async fn new() -> Self {
        Self::from_state(&test_state().await)
    }

    pub fn from_state(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            cats: state.cats.clone(),
            visits: state.visits.clone(),
            treatments: state.treatments.clone(),
            users: state.users.clone(),
        }
    }

    pub async fn cat(&self, name: &str) -> Cat {
        self.cats
            .create(NewCat {
                name: name.to_string(),
                age: 3,
                breed: "Siamese".to_string(),
                weight: 4.2,
            })
            .await
            .expect("cat fixture")
    }

    pub async fn visit_for(&self, cat_id: i64, motif: &str, veterinaire: &str) -> Visit {
        self.visits
            .create(NewVisit {
                date: Utc::now(),
                motif: motif.to_string(),
                veterinaire: veterinaire.to_string(),
                cat_id,
            })
            .await
            .expect("visit fixture")
    }

    pub async fn treatment_for(&self, visit_id: i64, name: &str) -> Treatment {
        self.treatments
            .create(NewTreatment {
                name: name.to_string(),
                visit_id,
            })
            .await
            .expect("treatment fixture")
    }

    pub async fn user(&self, email: &str, password: &str, role: Role) -> User {
        self.users
            .create(NewUser {
                email: email.to_string(),
                password: password.to_string(),
                role,
            })
            .await
            .expect("user fixture")
    }
}

/// `Authorization` header value for a fresh access token.
pub fn bearer(state: &AppState, email: &str, role: Role) -> String {
    let token = state
        .tokens
        .issue_access(email, role)
        .expect("token issues");
    format!("Bearer {}", token)
}

fn unavailable() -> DatabaseError {
    DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
}

/// Cat repository whose every call fails like an unreachable store.
pub struct FailingCatRepository;

#[async_trait]
impl CatRepository for FailingCatRepository {
    async fn create(&self, _cat: NewCat) -> Result<Cat, DatabaseError> {
        Err(unavailable())
    }

    async fn find_all(&self) -> Result<Vec<Cat>, DatabaseError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Cat, DatabaseError> {
        Err(unavailable())
    }

    async fn update(&self, _cat: &Cat) -> Result<Cat, DatabaseError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: i64) -> Result<(), DatabaseError> {
        Err(unavailable())
    }

    async fn cat_history(&self, _cat_id: i64) -> Result<Vec<VisitWithTreatments>, DatabaseError> {
        Err(unavailable())
    }
}
