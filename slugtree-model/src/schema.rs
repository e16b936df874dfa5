use serde::{Deserialize, Serialize};
use slugtree_types::EntryField;

/// Names the store field that holds each logical entry field.
///
/// Content types in a headless CMS are user-defined, so the field holding the
/// slug might be called `slug`, `urlSegment` or anything else. The engine only
/// ever talks in [`EntryField`]s and resolves them through this mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldMapping {
    pub title: String,
    pub parent: String,
    #[serde(alias = "slug")]
    pub slug_segment: String,
    pub full_path: String,
    pub path_meta: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            title: "title".into(),
            parent: "parent".into(),
            slug_segment: "slug".into(),
            full_path: "fullPath".into(),
            path_meta: "pathMeta".into(),
        }
    }
}

impl FieldMapping {
    /// Store field id for a logical field.
    pub fn field_id(&self, field: EntryField) -> &str {
        match field {
            EntryField::Title => &self.title,
            EntryField::Parent => &self.parent,
            EntryField::SlugSegment => &self.slug_segment,
            EntryField::FullPath => &self.full_path,
            EntryField::PathMeta => &self.path_meta,
        }
    }

    /// Reverse lookup: which logical field a store field id maps to, if any.
    pub fn logical_field(&self, field_id: &str) -> Option<EntryField> {
        EntryField::ALL
            .into_iter()
            .find(|field| self.field_id(*field) == field_id)
    }

    /// Returns the store field ids that are mapped to more than one logical field.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(EntryField::ALL.len());
        let mut dupes = Vec::new();
        for field in EntryField::ALL {
            let id = self.field_id(field);
            if seen.contains(&id) {
                if !dupes.contains(&id) {
                    dupes.push(id);
                }
            } else {
                seen.push(id);
            }
        }
        dupes
    }
}
