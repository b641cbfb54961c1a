use axum::Extension;

use crate::api::responses::WhoAmI;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/v1/whoami - Identity and role of the current token
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<WhoAmI> {
    Ok(ApiResponse::success(WhoAmI {
        email: user.email,
        role: user.role,
    }))
}
