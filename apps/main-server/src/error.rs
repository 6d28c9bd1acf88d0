//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use user_store::UserStoreError;

/// Stable machine-readable error codes carried in error response bodies.
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const SELF_LINK: &str = "SELF_LINK";
    pub const ALREADY_LINKED: &str = "ALREADY_LINKED";
    pub const STILL_LINKED: &str = "STILL_LINKED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Malformed create/update payload.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A user cannot be linked to themselves.
    #[error("Cannot link a user to themselves")]
    SelfLink,

    /// The two users are already linked, in at least one direction.
    #[error("Users already linked")]
    AlreadyLinked,

    /// A user with remaining friendships cannot be deleted.
    #[error("Cannot delete user while linked. Unlink first.")]
    StillLinked,

    /// Storage layer failure.
    #[error("Storage error: {0}")]
    Store(#[source] UserStoreError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

// Store-level "not found" surfaces as a domain 404; everything else from the
// store is an unexpected storage failure.
impl From<UserStoreError> for ServerError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::NotFound { .. } => ServerError::NotFound(err.to_string()),
            other => ServerError::Store(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ServerError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, msg.clone())
            }
            ServerError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, error_codes::NOT_FOUND, msg.clone())
            }
            ServerError::SelfLink => {
                (StatusCode::BAD_REQUEST, error_codes::SELF_LINK, self.to_string())
            }
            ServerError::AlreadyLinked => {
                (StatusCode::CONFLICT, error_codes::ALREADY_LINKED, self.to_string())
            }
            ServerError::StillLinked => {
                (StatusCode::CONFLICT, error_codes::STILL_LINKED, self.to_string())
            }
            ServerError::Store(e) => {
                tracing::error!(error = %e, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::STORAGE_ERROR,
                    "Storage failure".to_string(),
                )
            }
            ServerError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR, msg.clone())
            }
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_domain_not_found() {
        let err: ServerError = UserStoreError::not_found("User", "abc").into();
        assert!(matches!(err, ServerError::NotFound(_)));
    }

    #[test]
    fn test_other_store_errors_stay_storage_errors() {
        let err: ServerError = UserStoreError::Other("disk on fire".to_string()).into();
        assert!(matches!(err, ServerError::Store(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServerError::SelfLink.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::AlreadyLinked.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::StillLinked.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::NotFound("User not found".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
