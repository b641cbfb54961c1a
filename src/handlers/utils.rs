use crate::database::DatabaseError;
use crate::error::ApiError;

/// Map a repository failure onto the API error for this operation. Not-found
/// keeps the repository message; anything else is logged and reported as
/// `failure` without store details.
pub(crate) fn store_error(failure: &'static str) -> impl Fn(DatabaseError) -> ApiError {
    move |err| match err {
        DatabaseError::NotFound(msg) => ApiError::not_found(msg),
        other => {
            tracing::error!("{}: {}", failure, other);
            ApiError::internal_server_error(failure)
        }
    }
}
