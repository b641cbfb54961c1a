//! Repository contracts, one per entity. Handlers only see these traits; the
//! SQL implementations live in `database::repositories`.

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Cat, NewCat, NewTreatment, NewUser, NewVisit, Treatment, User, Visit, VisitWithTreatments,
};

#[async_trait]
pub trait CatRepository: Send + Sync {
    async fn create(&self, cat: NewCat) -> Result<Cat, DatabaseError>;

    async fn find_all(&self) -> Result<Vec<Cat>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Cat, DatabaseError>;

    /// Overwrite every mutable column of `cat.id`.
    async fn update(&self, cat: &Cat) -> Result<Cat, DatabaseError>;

    /// Soft-delete the cat and detach its visits.
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;

    /// Every visit of the cat with its treatments.
    async fn cat_history(&self, cat_id: i64) -> Result<Vec<VisitWithTreatments>, DatabaseError>;
}

#[async_trait]
pub trait VisitRepository: Send + Sync {
    async fn create(&self, visit: NewVisit) -> Result<Visit, DatabaseError>;

    async fn find_all(&self) -> Result<Vec<Visit>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Visit, DatabaseError>;

    async fn find_by_cat_id(&self, cat_id: i64) -> Result<Vec<Visit>, DatabaseError>;

    async fn update(&self, visit: &Visit) -> Result<Visit, DatabaseError>;

    /// Soft-delete the visit and remove its treatments.
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;

    /// Equality filters; an empty string means "no filter" for that column.
    async fn filter_by_motif_or_veterinaire(
        &self,
        motif: &str,
        veterinaire: &str,
    ) -> Result<Vec<Visit>, DatabaseError>;
}

#[async_trait]
pub trait TreatmentRepository: Send + Sync {
    async fn create(&self, treatment: NewTreatment) -> Result<Treatment, DatabaseError>;

    async fn find_all(&self) -> Result<Vec<Treatment>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Treatment, DatabaseError>;

    async fn update(&self, treatment: &Treatment) -> Result<Treatment, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;

    async fn find_by_visit_id(&self, visit_id: i64) -> Result<Vec<Treatment>, DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Hashes `user.password` before inserting.
    async fn create(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_all(&self) -> Result<Vec<User>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<User, DatabaseError>;

    /// Stores the record as given; `password` must already be a hash.
    async fn update(&self, user: &User) -> Result<User, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;

    async fn get_user_by_email(&self, email: &str) -> Result<User, DatabaseError>;

    /// Revives a soft-deleted user with `user.email`, re-hashing the password and
    /// replacing the role. `None` when no deleted row holds that email.
    async fn restore(&self, user: NewUser) -> Result<Option<User>, DatabaseError>;
}
