//! SQLite-backed implementations of the repository traits.

mod cat;
mod treatment;
mod user;
mod visit;

pub use cat::SqlCatRepository;
pub use treatment::SqlTreatmentRepository;
pub use user::SqlUserRepository;
pub use visit::SqlVisitRepository;

use crate::database::manager::DatabaseError;

fn not_found(entity: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", entity))
}
