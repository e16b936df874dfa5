use crate::{FieldMapping, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use slugtree_types::{ContentTypeId, EntryField, EntryId};

/// System metadata of an entry, owned by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySys {
    pub id: EntryId,
    pub content_type: ContentTypeId,
}

impl EntrySys {
    pub fn new(id: EntryId, content_type: ContentTypeId) -> Self {
        Self { id, content_type }
    }
}

/// Engine-owned path metadata persisted alongside the full path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathMeta {
    /// Ancestor ids visited by the most recent resolution, nearest first.
    pub path_chain: Vec<EntryId>,
    /// Superseded full paths in the order they were replaced. Append-only.
    pub previous_paths: Vec<String>,
}

impl PathMeta {
    /// JSON form written to the store.
    pub fn to_value(&self) -> Value {
        json!({
            "pathChain": self.path_chain.iter().map(EntryId::as_str).collect::<Vec<_>>(),
            "previousPaths": self.previous_paths,
        })
    }
}

/// An entry as the content store returns it: system metadata plus a keyed
/// bag of untyped fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub sys: EntrySys,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawEntry {
    pub fn new(sys: EntrySys) -> Self {
        Self {
            sys,
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, field_id: &str, value: Value) -> Self {
        self.set(field_id, value);
        self
    }

    /// Raw value of a store field.
    pub fn get(&self, field_id: &str) -> Option<&Value> {
        self.fields.get(field_id)
    }

    /// Extract a string field.
    pub fn get_str(&self, field_id: &str) -> Option<&str> {
        self.get(field_id).and_then(Value::as_str)
    }

    /// Sets a store field, replacing any previous value. `null` removes it.
    pub fn set(&mut self, field_id: &str, value: Value) {
        if value.is_null() {
            self.fields.remove(field_id);
        } else {
            self.fields.insert(field_id.to_string(), value);
        }
    }
}

/// A validated content entry.
///
/// Built from a [`RawEntry`] with [`Entry::from_raw`]. External actors own
/// `title` and `parent`; the path engine owns `slug_segment`, `full_path`
/// and `path_meta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub content_type: ContentTypeId,
    pub title: String,
    /// `None` makes the entry a root.
    pub parent: Option<EntryId>,
    pub slug_segment: Option<String>,
    pub full_path: Option<String>,
    pub path_meta: PathMeta,
}

impl Entry {
    /// A fresh entry with only a title, as an editor would create it.
    pub fn new(id: EntryId, content_type: ContentTypeId, title: impl Into<String>) -> Self {
        Self {
            id,
            content_type,
            title: title.into(),
            parent: None,
            slug_segment: None,
            full_path: None,
            path_meta: PathMeta::default(),
        }
    }

    pub fn with_parent(mut self, parent: EntryId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_slug_segment(mut self, segment: impl Into<String>) -> Self {
        self.slug_segment = Some(segment.into());
        self
    }

    pub fn with_full_path(mut self, path: impl Into<String>) -> Self {
        self.full_path = Some(path.into());
        self
    }

    pub fn sys(&self) -> EntrySys {
        EntrySys::new(self.id.clone(), self.content_type.clone())
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The stored full path, if one has been resolved.
    pub fn resolved_full_path(&self) -> Option<&str> {
        self.full_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Validates a raw field bag into a typed entry.
    pub fn from_raw(raw: &RawEntry, mapping: &FieldMapping) -> ValidationResult<Self> {
        let entry = raw.sys.id.as_str();

        let title_field = mapping.field_id(EntryField::Title);
        let title = match raw.get(title_field) {
            None | Some(Value::Null) => {
                return Err(ValidationError::MissingField {
                    entry: entry.to_string(),
                    field: title_field.to_string(),
                });
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(ValidationError::BlankField {
                    entry: entry.to_string(),
                    field: title_field.to_string(),
                });
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(wrong_type(entry, title_field, "a string")),
        };

        Ok(Self {
            id: raw.sys.id.clone(),
            content_type: raw.sys.content_type.clone(),
            title,
            parent: parse_parent(raw, mapping.field_id(EntryField::Parent))?,
            slug_segment: optional_str(raw, mapping.field_id(EntryField::SlugSegment))?,
            full_path: optional_str(raw, mapping.field_id(EntryField::FullPath))?,
            path_meta: parse_path_meta(raw, mapping.field_id(EntryField::PathMeta))?,
        })
    }

    /// Field bag form of this entry, as a store would hold it.
    pub fn to_raw(&self, mapping: &FieldMapping) -> RawEntry {
        let mut raw = RawEntry::new(self.sys());
        raw.set(mapping.field_id(EntryField::Title), json!(self.title));
        if let Some(parent) = &self.parent {
            raw.set(mapping.field_id(EntryField::Parent), json!(parent.as_str()));
        }
        if let Some(segment) = &self.slug_segment {
            raw.set(mapping.field_id(EntryField::SlugSegment), json!(segment));
        }
        if let Some(path) = &self.full_path {
            raw.set(mapping.field_id(EntryField::FullPath), json!(path));
        }
        raw.set(
            mapping.field_id(EntryField::PathMeta),
            self.path_meta.to_value(),
        );
        raw
    }
}

fn wrong_type(entry: &str, field: &str, expected: &'static str) -> ValidationError {
    ValidationError::WrongType {
        entry: entry.to_string(),
        field: field.to_string(),
        expected,
    }
}

/// Blank strings count as unset.
fn optional_str(raw: &RawEntry, field: &str) -> ValidationResult<Option<String>> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(wrong_type(raw.sys.id.as_str(), field, "a string")),
    }
}

/// Accepts either a bare id or a link object `{"sys": {"id": ...}}`.
fn parse_parent(raw: &RawEntry, field: &str) -> ValidationResult<Option<EntryId>> {
    let entry = raw.sys.id.as_str();
    let id = match raw.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::String(s)) => s.as_str(),
        Some(link @ Value::Object(_)) => link
            .pointer("/sys/id")
            .and_then(Value::as_str)
            .ok_or_else(|| wrong_type(entry, field, "an entry id or link object"))?,
        Some(_) => return Err(wrong_type(entry, field, "an entry id or link object")),
    };

    EntryId::parse(id)
        .map(Some)
        .map_err(|source| ValidationError::InvalidReference {
            entry: entry.to_string(),
            field: field.to_string(),
            source,
        })
}

fn parse_path_meta(raw: &RawEntry, field: &str) -> ValidationResult<PathMeta> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(PathMeta::default()),
        Some(value @ Value::Object(_)) => {
            serde_json::from_value(value.clone()).map_err(|e| ValidationError::MalformedPathMeta {
                entry: raw.sys.id.to_string(),
                field: field.to_string(),
                reason: e.to_string(),
            })
        }
        Some(_) => Err(wrong_type(raw.sys.id.as_str(), field, "an object")),
    }
}
