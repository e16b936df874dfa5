//! The repository abstraction the path engine is written against.

use crate::{EntryFilter, StorageResult};
use async_trait::async_trait;
use serde_json::{Value, json};
use slugtree_model::{Entry, EntrySys, PathMeta};
use slugtree_types::{EntryField, EntryId};

/// A write to one of the engine-owned fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    SlugSegment(String),
    FullPath(String),
    PathMeta(PathMeta),
}

impl FieldUpdate {
    /// The logical field this update targets.
    pub fn field(&self) -> EntryField {
        match self {
            Self::SlugSegment(_) => EntryField::SlugSegment,
            Self::FullPath(_) => EntryField::FullPath,
            Self::PathMeta(_) => EntryField::PathMeta,
        }
    }

    /// JSON value to store.
    pub fn to_value(&self) -> Value {
        match self {
            Self::SlugSegment(s) | Self::FullPath(s) => json!(s),
            Self::PathMeta(meta) => meta.to_value(),
        }
    }

    /// Applies the update to a typed entry.
    pub fn apply(&self, entry: &mut Entry) {
        match self {
            Self::SlugSegment(s) => entry.slug_segment = Some(s.clone()),
            Self::FullPath(s) => entry.full_path = Some(s.clone()),
            Self::PathMeta(meta) => entry.path_meta = meta.clone(),
        }
    }
}

/// Abstract content store interface.
///
/// Every call is a suspension point. Timeouts and cancellation belong to the
/// implementation; a failed call surfaces as a [`crate::StorageError`].
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Returns the name of the backing store.
    fn name(&self) -> &'static str;

    /// Fetches and validates a single entry.
    async fn get_entry(&self, id: &EntryId) -> StorageResult<Entry>;

    /// Returns all entries matching the filter, in store order.
    async fn query_entries(&self, filter: &EntryFilter) -> StorageResult<Vec<Entry>>;

    /// Writes one engine-owned field.
    async fn set_field(&self, id: &EntryId, update: FieldUpdate) -> StorageResult<()>;

    /// Fetches only the system metadata of an entry.
    async fn get_sys(&self, id: &EntryId) -> StorageResult<EntrySys>;
}
