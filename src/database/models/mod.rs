pub mod cat;
pub mod treatment;
pub mod user;
pub mod visit;

pub use cat::{Cat, NewCat};
pub use treatment::{NewTreatment, Treatment};
pub use user::{NewUser, User};
pub use visit::{NewVisit, Visit, VisitWithTreatments};
