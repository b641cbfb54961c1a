use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::repositories::{
    SqlCatRepository, SqlTreatmentRepository, SqlUserRepository, SqlVisitRepository,
};
use crate::database::{
    CatRepository, DatabaseManager, TreatmentRepository, UserRepository, VisitRepository,
};

/// Shared by every handler; built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseManager,
    pub cats: Arc<dyn CatRepository>,
    pub visits: Arc<dyn VisitRepository>,
    pub treatments: Arc<dyn TreatmentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<TokenService>,
    /// Cost used when a handler re-hashes a password
    pub bcrypt_cost: u32,
}

impl AppState {
    /// Wire the SQL repositories over `db`'s pool.
    pub fn new(db: DatabaseManager, config: &AppConfig) -> Self {
        let pool = db.pool().clone();

        Self {
            cats: Arc::new(SqlCatRepository::new(pool.clone())),
            visits: Arc::new(SqlVisitRepository::new(pool.clone())),
            treatments: Arc::new(SqlTreatmentRepository::new(pool.clone())),
            users: Arc::new(SqlUserRepository::new(pool, config.security.bcrypt_cost)),
            tokens: Arc::new(TokenService::new(&config.security)),
            bcrypt_cost: config.security.bcrypt_cost,
            db,
        }
    }
}
