//! Error types for the repository layer.

use slugtree_model::ValidationError;
use thiserror::Error;

/// Result type for repository operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur talking to a content store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The entry does not exist.
    #[error("entry not found: {0}")]
    NotFound(String),

    /// Transport failure or timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The store refused the operation.
    #[error("permission denied: {0}")]
    Permission(String),

    /// The store returned an entry that does not validate.
    #[error("invalid entry: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other non-success response.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

impl StorageError {
    /// Returns true if the entry was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    /// Returns true for failures that may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::Network(_) => true,
            StorageError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
