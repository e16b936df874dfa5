//! Core type definitions for slugtree.
//!
//! This crate defines the small, store-agnostic types shared by every other
//! slugtree crate:
//! - Entry and content-type identifiers
//! - Logical entry fields (the engine's view of a store's field bag)
//! - Change events that drive path recomputation
//!
//! Typed entries, field mappings and validation live in `slugtree-model`.

mod event;
mod ids;

pub use event::{ChangeEvent, ChangeKind, EntryField, EventId};
pub use ids::{ContentTypeId, EntryId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid {kind} '{value}': {reason}")]
    InvalidId {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("unknown entry field: {0}")]
    UnknownField(String),
}
