pub mod manager;
pub mod models;
pub mod repositories;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{CatRepository, TreatmentRepository, UserRepository, VisitRepository};
