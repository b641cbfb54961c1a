use serde::Serialize;

use crate::auth::Role;
use crate::database::models::{Cat, VisitWithTreatments};

/// Body of `GET /cats/{id}/history`.
#[derive(Debug, Serialize)]
pub struct CatHistory {
    pub cat: Cat,
    pub visits: Vec<VisitWithTreatments>,
}

/// Identity carried by the caller's access token.
#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}
