use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::AuthUser;
use crate::auth::Role;
use crate::error::ApiError;

/// Allow-list of roles for a group of routes.
#[derive(Clone, Copy, Debug)]
pub struct RoleGate(pub &'static [Role]);

impl RoleGate {
    pub const READERS: RoleGate = RoleGate(&[Role::Admin, Role::User]);
    pub const ADMINS: RoleGate = RoleGate(&[Role::Admin]);

    pub fn allows(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

/// Must run inside [`super::jwt_auth_middleware`].
pub async fn require_role(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return Err(ApiError::unauthorized("Missing token"));
    };

    if !gate.allows(user.role) {
        tracing::warn!(
            "{} ({}) denied {} {}",
            user.email,
            user.role,
            request.method(),
            request.uri().path()
        );
        return Err(ApiError::forbidden("Forbidden: insufficient permissions"));
    }

    Ok(next.run(request).await)
}
