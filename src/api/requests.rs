use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::Role;
use crate::error::ApiError;

/// Field checks run after a body has been decoded.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Unwrap a JSON body and validate it. Undecodable bodies all report the
/// same message so clients can't probe the decoder.
pub fn decode<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::bad_request("invalid request payload")
    })?;
    body.validate()?;
    Ok(body)
}

/// Parse a path identifier, failing with `message` when it isn't an integer.
pub fn parse_id(raw: &str, message: &'static str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::bad_request(message))
}

fn require_text(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} is required", field)));
    }
    Ok(())
}

fn require_reference(value: i64, field: &str) -> Result<(), ApiError> {
    if value <= 0 {
        return Err(ApiError::bad_request(format!("{} must be a positive identifier", field)));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatRequest {
    pub name: String,
    pub age: i64,
    pub breed: String,
    pub weight: f64,
}

impl Validate for CatRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text(&self.name, "name")?;
        require_text(&self.breed, "breed")?;
        if self.age < 0 {
            return Err(ApiError::bad_request("age must not be negative"));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(ApiError::bad_request("weight must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisitRequest {
    pub date: DateTime<Utc>,
    pub motif: String,
    pub veterinaire: String,
    pub cat_id: i64,
}

impl Validate for VisitRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text(&self.motif, "motif")?;
        require_text(&self.veterinaire, "veterinaire")?;
        require_reference(self.cat_id, "cat_id")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreatmentRequest {
    pub name: String,
    pub visit_id: i64,
}

impl Validate for TreatmentRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text(&self.name, "name")?;
        require_reference(self.visit_id, "visit_id")
    }
}

#[derive(Clone, Deserialize)]
pub struct UserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserRequest {
    /// Requested role, or the default role when none was sent.
    pub fn role(&self) -> Result<Role, ApiError> {
        match self.role.as_deref() {
            None | Some("") => Ok(Role::default()),
            Some(raw) => raw.parse().map_err(ApiError::bad_request),
        }
    }
}

impl Validate for UserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text(&self.email, "email")?;
        require_text(&self.password, "password")?;
        self.role().map(|_| ())
    }
}

impl std::fmt::Debug for UserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRequest")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Login and refresh body.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), ApiError> {
        require_text(&self.email, "email")?;
        require_text(&self.password, "password")
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Query string of `GET /visits/filter`. Missing parameters mean "any".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitFilter {
    #[serde(default)]
    pub motif: String,
    #[serde(default)]
    pub veterinaire: String,
}
