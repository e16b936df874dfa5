//! Global full-path uniqueness checks.
//!
//! Detection is advisory: the store is eventually consistent and writes are
//! not transactional, so a collision is reported after the fact instead of
//! being prevented.

use crate::PathResult;
use serde::Serialize;
use slugtree_store::{ContentRepository, EntryFilter};
use slugtree_types::{ContentTypeId, EntryField, EntryId};
use std::collections::{BTreeMap, BTreeSet};

/// A full path claimed by more than one managed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathConflict {
    pub full_path: String,
    pub entries: Vec<EntryId>,
}

/// Checks one full path against the managed population.
pub struct ConflictDetector<'a> {
    repo: &'a dyn ContentRepository,
    managed: &'a BTreeSet<ContentTypeId>,
}

impl<'a> ConflictDetector<'a> {
    pub fn new(repo: &'a dyn ContentRepository, managed: &'a BTreeSet<ContentTypeId>) -> Self {
        Self { repo, managed }
    }

    /// First managed entry other than `self_id` whose full path equals `full_path`.
    pub async fn detect(&self, full_path: &str, self_id: &EntryId) -> PathResult<Option<EntryId>> {
        let filter = EntryFilter::new()
            .content_types(self.managed)
            .field_eq(EntryField::FullPath, full_path)
            .excluding(self_id)
            .limit(1)
            .select([EntryField::FullPath]);
        let found = self.repo.query_entries(&filter).await?;
        Ok(found.into_iter().next().map(|e| e.id))
    }
}

/// Every full path shared by two or more managed entries, ordered by path.
pub async fn scan_conflicts(
    repo: &dyn ContentRepository,
    managed: &BTreeSet<ContentTypeId>,
) -> PathResult<Vec<PathConflict>> {
    let filter = EntryFilter::new()
        .content_types(managed)
        .select([EntryField::FullPath]);
    let entries = repo.query_entries(&filter).await?;

    let mut claims: BTreeMap<String, Vec<EntryId>> = BTreeMap::new();
    for entry in entries {
        if let Some(path) = entry.resolved_full_path() {
            claims.entry(path.to_string()).or_default().push(entry.id);
        }
    }

    Ok(claims
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(full_path, entries)| PathConflict { full_path, entries })
        .collect())
}
