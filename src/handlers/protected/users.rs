use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::requests::UserRequest;
use crate::api::{decode, parse_id};
use crate::auth::password;
use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::handlers::utils::store_error;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const INVALID_ID: &str = "invalid user ID";

/// GET /api/v1/users - Admin only. Password hashes and refresh tokens are
/// never serialized.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.users.find_all().await.map_err(store_error("unable to fetch users"))?;
    Ok(ApiResponse::success(users))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let id = parse_id(&id, INVALID_ID)?;
    let user = state.users.find_by_id(id).await.map_err(store_error("unable to fetch user"))?;
    Ok(ApiResponse::success(user))
}

/// POST /api/v1/users - Create an account
///
/// Expected Input:
/// ```json
/// { "email": "a@b.com", "password": "secret", "role": "user" }
/// ```
/// `role` is optional and defaults to `"user"`.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> ApiResult<User> {
    let body = decode(payload)?;
    let role = body.role()?;

    let user = state
        .users
        .create(NewUser {
            email: body.email,
            password: body.password,
            role,
        })
        .await
        .map_err(store_error("unable to save user"))?;

    Ok(ApiResponse::created(user))
}

/// PUT /api/v1/users/:id - Replace email, password and role. The password is
/// re-hashed; a missing role keeps the current one.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> ApiResult<User> {
    let id = parse_id(&id, INVALID_ID)?;
    let body = decode(payload)?;

    let mut user = state.users.find_by_id(id).await.map_err(store_error("failed to update user"))?;
    if body.role.is_some() {
        user.role = body.role()?.as_str().to_string();
    }
    user.email = body.email;
    user.password = password::hash_password_async(body.password, state.bcrypt_cost)
        .await
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ApiError::internal_server_error("failed to update user")
        })?;

    let user = state.users.update(&user).await.map_err(store_error("failed to update user"))?;
    Ok(ApiResponse::success(user))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, INVALID_ID)?;
    state.users.delete(id).await.map_err(store_error("failed to delete user"))?;
    Ok(ApiResponse::no_content())
}
