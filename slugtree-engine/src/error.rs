//! Error types for path resolution.

use slugtree_store::StorageError;
use slugtree_types::EntryId;
use thiserror::Error;

/// Result type for engine operations.
pub type PathResult<T> = Result<T, PathError>;

/// Errors that abort a recompute run.
#[derive(Debug, Error)]
pub enum PathError {
    /// The entry would become its own ancestor.
    #[error("cycle detected: {entry} reaches itself through ancestor {ancestor}")]
    CycleDetected { entry: EntryId, ancestor: EntryId },

    /// Every candidate segment among the siblings is taken.
    #[error("no free segment for {entry}: '{base}' and {attempts} numbered variants are taken")]
    AllocationExhausted {
        entry: EntryId,
        base: String,
        attempts: u32,
    },

    /// A content store call failed.
    #[error("repository error: {0}")]
    Repository(#[from] StorageError),

    /// Invalid engine configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PathError {
    /// The single message shown to an editor when a run fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::CycleDetected { .. } => {
                "This entry cannot be placed under one of its own descendants. Choose a different parent."
                    .to_string()
            }
            Self::AllocationExhausted { base, .. } => format!(
                "Too many sibling entries already use the slug '{base}'. Set a different slug."
            ),
            Self::Repository(StorageError::Validation(e)) => {
                format!("The entry could not be read: {e}")
            }
            Self::Repository(e) => {
                format!("The URL path could not be updated because the content store failed: {e}")
            }
            Self::Config(msg) => format!("The path engine is misconfigured: {msg}"),
        }
    }
}
