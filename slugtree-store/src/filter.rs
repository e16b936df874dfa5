use slugtree_model::Entry;
use slugtree_types::{ContentTypeId, EntryField, EntryId};

/// Constraint on an entry's parent reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParentFilter {
    /// No constraint.
    #[default]
    Any,
    /// Parent reference equals the given id.
    Equals(EntryId),
    /// No parent reference (root entries).
    Missing,
}

impl ParentFilter {
    /// Sibling filter for an entry with the given parent.
    pub fn siblings_of(parent: Option<&EntryId>) -> Self {
        match parent {
            Some(id) => Self::Equals(id.clone()),
            None => Self::Missing,
        }
    }

    fn matches(&self, parent: Option<&EntryId>) -> bool {
        match self {
            Self::Any => true,
            Self::Equals(id) => parent == Some(id),
            Self::Missing => parent.is_none(),
        }
    }
}

/// Query over the entry population.
///
/// All constraints are conjunctive. `select` is a projection hint: stores may
/// return more fields than requested, never fewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Content type must be one of these. Empty means any type.
    pub content_types: Vec<ContentTypeId>,
    pub parent: ParentFilter,
    /// Each logical field must equal the given string.
    pub field_equals: Vec<(EntryField, String)>,
    /// Exclude this entry from the results.
    pub exclude: Option<EntryId>,
    pub limit: Option<usize>,
    pub select: Vec<EntryField>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_types<'a>(mut self, types: impl IntoIterator<Item = &'a ContentTypeId>) -> Self {
        self.content_types = types.into_iter().cloned().collect();
        self
    }

    pub fn parent(mut self, parent: ParentFilter) -> Self {
        self.parent = parent;
        self
    }

    pub fn field_eq(mut self, field: EntryField, value: impl Into<String>) -> Self {
        self.field_equals.push((field, value.into()));
        self
    }

    pub fn excluding(mut self, id: &EntryId) -> Self {
        self.exclude = Some(id.clone());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn select(mut self, fields: impl IntoIterator<Item = EntryField>) -> Self {
        self.select = fields.into_iter().collect();
        self
    }

    /// Whether an entry satisfies every constraint except `limit`.
    pub fn matches(&self, entry: &Entry) -> bool {
        if !self.content_types.is_empty() && !self.content_types.contains(&entry.content_type) {
            return false;
        }
        if self.exclude.as_ref() == Some(&entry.id) {
            return false;
        }
        if !self.parent.matches(entry.parent.as_ref()) {
            return false;
        }
        self.field_equals
            .iter()
            .all(|(field, expected)| field_str(entry, *field) == Some(expected.as_str()))
    }
}

fn field_str(entry: &Entry, field: EntryField) -> Option<&str> {
    match field {
        EntryField::Title => Some(entry.title.as_str()),
        EntryField::Parent => entry.parent.as_ref().map(EntryId::as_str),
        EntryField::SlugSegment => entry.slug_segment.as_deref(),
        EntryField::FullPath => entry.full_path.as_deref(),
        EntryField::PathMeta => None,
    }
}
