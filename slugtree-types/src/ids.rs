//! Identifier types used throughout slugtree.
//!
//! Content stores hand out opaque string identifiers. Both id types accept
//! ASCII letters, digits, `-`, `_` and `.` up to 64 characters, which covers
//! the id formats of the common headless CMS APIs and keeps ids safe to embed
//! in request paths.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const MAX_ID_LEN: usize = 64;

fn validate(kind: &'static str, value: &str) -> Result<(), Error> {
    let reason = if value.is_empty() {
        "must not be empty"
    } else if value.len() > MAX_ID_LEN {
        "longer than 64 characters"
    } else if !value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    {
        "contains characters other than [A-Za-z0-9._-]"
    } else {
        return Ok(());
    };

    Err(Error::InvalidId {
        kind,
        value: value.to_string(),
        reason,
    })
}

/// Opaque, stable identifier of an entry in the content store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Creates a fresh entry ID (UUID v7, simple form) for entries created locally.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Parses an entry ID handed out by a content store.
    pub fn parse(s: &str) -> Result<Self, Error> {
        validate("entry id", s)?;
        Ok(Self(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntryId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntryId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate("entry id", &value)?;
        Ok(Self(value))
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a content type (e.g. `page`, `blogPost`).
///
/// Only entries whose content type is in the configured managed set take part
/// in path resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentTypeId(String);

impl ContentTypeId {
    /// Parses a content type ID.
    pub fn parse(s: &str) -> Result<Self, Error> {
        validate("content type id", s)?;
        Ok(Self(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentTypeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentTypeId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate("content type id", &value)?;
        Ok(Self(value))
    }
}

impl From<ContentTypeId> for String {
    fn from(id: ContentTypeId) -> Self {
        id.0
    }
}

impl AsRef<str> for ContentTypeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
