//! User store error types.

use thiserror::Error;

/// Errors that can occur during user store operations.
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Duplicate entity.
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A pairwise update could not be applied.
    #[error("Write conflict: {0}")]
    Conflict(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl UserStoreError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity_type,
            id: id.into(),
        }
    }
}

/// Result type for user store operations.
pub type UserStoreResult<T> = Result<T, UserStoreError>;
