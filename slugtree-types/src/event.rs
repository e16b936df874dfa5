//! Change events that drive path recomputation.
//!
//! The content store (or whatever watches it) emits a [`ChangeEvent`] when an
//! entry is created or one of its fields is written. The engine only reacts
//! to changes of its *inputs* (`title`, `parent`); writes to the derived
//! fields it owns are reported too but never schedule another run.

use crate::{ContentTypeId, EntryId, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new event ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Logical fields of an entry, independent of how a store names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryField {
    /// Display title; source of the default slug.
    Title,
    /// Reference to the parent entry.
    Parent,
    /// The entry's own path component.
    SlugSegment,
    /// The resolved, globally unique path.
    FullPath,
    /// Path chain and previous paths.
    PathMeta,
}

impl EntryField {
    /// All fields, inputs first.
    pub const ALL: [EntryField; 5] = [
        Self::Title,
        Self::Parent,
        Self::SlugSegment,
        Self::FullPath,
        Self::PathMeta,
    ];

    /// The camelCase name used in events and configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Parent => "parent",
            Self::SlugSegment => "slugSegment",
            Self::FullPath => "fullPath",
            Self::PathMeta => "pathMeta",
        }
    }

    /// Whether the field is owned and written exclusively by the engine.
    #[must_use]
    pub const fn is_derived(&self) -> bool {
        matches!(self, Self::SlugSegment | Self::FullPath | Self::PathMeta)
    }
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// What happened to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "camelCase")]
pub enum ChangeKind {
    /// The entry was created.
    Created,
    /// A single field was written.
    FieldChanged { field: EntryField },
}

/// A change notification for a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Unique identifier for this event.
    pub id: EventId,
    /// The entry that changed.
    pub entry_id: EntryId,
    /// Content type of the entry, so consumers can filter without a lookup.
    pub content_type: ContentTypeId,
    /// What changed.
    pub kind: ChangeKind,
}

impl ChangeEvent {
    /// Creates a new change event.
    #[must_use]
    pub fn new(entry_id: EntryId, content_type: ContentTypeId, kind: ChangeKind) -> Self {
        Self {
            id: EventId::new(),
            entry_id,
            content_type,
            kind,
        }
    }

    /// Creates an entry-created event.
    #[must_use]
    pub fn created(entry_id: EntryId, content_type: ContentTypeId) -> Self {
        Self::new(entry_id, content_type, ChangeKind::Created)
    }

    /// Creates a field-changed event.
    #[must_use]
    pub fn field_changed(entry_id: EntryId, content_type: ContentTypeId, field: EntryField) -> Self {
        Self::new(entry_id, content_type, ChangeKind::FieldChanged { field })
    }

    /// Whether the event touches an input of path resolution.
    ///
    /// Writes to derived fields return `false`; reacting to them would let
    /// the engine re-trigger itself.
    #[must_use]
    pub fn affects_path_inputs(&self) -> bool {
        match &self.kind {
            ChangeKind::Created => true,
            ChangeKind::FieldChanged { field } => !field.is_derived(),
        }
    }

    /// Serializes the event to JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses an event from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
