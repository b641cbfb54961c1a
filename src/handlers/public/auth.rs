use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::requests::Credentials;
use crate::api::responses::AccessToken;
use crate::api::decode;
use crate::auth::{password, TokenPair};
use crate::database::models::User;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid email or password";

/// POST /login - Exchange credentials for an access and refresh token
///
/// Expected Input:
/// ```json
/// { "email": "vet@clinic.test", "password": "string" }
/// ```
///
/// Expected Output:
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI...", "refresh_token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// The refresh token is stored on the user, replacing any earlier one.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<TokenPair> {
    let credentials = decode(payload)?;
    let mut user = authenticate(&state, credentials).await?;

    let pair = state.tokens.issue_pair(&user.email, user.role())?;
    user.refresh_token = Some(pair.refresh_token.clone());
    state.users.update(&user).await.map_err(|e| {
        tracing::error!("Failed to store refresh token for {}: {}", user.email, e);
        ApiError::internal_server_error("Failed to generate token")
    })?;

    tracing::info!("{} logged in", user.email);
    Ok(ApiResponse::success(pair))
}

/// POST /login/refresh - Issue a fresh access token
///
/// Takes the same body as `/login` and returns `{ "token": "..." }`.
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<AccessToken> {
    let credentials = decode(payload)?;
    let user = authenticate(&state, credentials).await?;

    let token = state.tokens.issue_access(&user.email, user.role())?;
    Ok(ApiResponse::success(AccessToken { token }))
}

/// Look up the user and check the password. Unknown email and wrong password
/// are indistinguishable to the caller.
async fn authenticate(state: &AppState, credentials: Credentials) -> Result<User, ApiError> {
    let user = match state.users.get_user_by_email(&credentials.email).await {
        Ok(user) => user,
        Err(DatabaseError::NotFound(msg)) => {
            tracing::warn!("Login rejected: {}", msg);
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        }
        Err(e) => {
            tracing::error!("User lookup failed: {}", e);
            return Err(ApiError::internal_server_error("Database error occurred"));
        }
    };

    if !password::verify_password_async(credentials.password, user.password.clone()).await {
        tracing::warn!("Login rejected: wrong password for {}", user.email);
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    Ok(user)
}
