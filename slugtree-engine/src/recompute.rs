//! One recompute run for one entry.
//!
//! Steps, in order:
//! 1. read the entry
//! 2. allocate a sibling-unique segment
//! 3. build the full path and ancestor chain
//! 4. diff the derived fields against what is stored and write only changes,
//!    with the history update folded into the `pathMeta` write
//! 5. check the new full path for collisions (advisory)
//!
//! Any error before step 5 aborts the run with no further writes. `pathMeta`
//! is written before `fullPath`, so a superseded path is in the history
//! before the stored path moves on. Entries of unmanaged content types are
//! left untouched.

use crate::allocator::SegmentAllocator;
use crate::builder::PathBuilder;
use crate::conflict::ConflictDetector;
use crate::{EngineConfig, PathResult, history};
use serde::Serialize;
use slugtree_model::PathMeta;
use slugtree_store::{ContentRepository, FieldUpdate};
use slugtree_types::{EntryField, EntryId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub entry_id: EntryId,
    /// Fields written during this run, in write order.
    pub written: Vec<EntryField>,
    pub slug_segment: String,
    pub full_path: String,
    /// The full path this run replaced, if it changed.
    pub superseded: Option<String>,
    /// Another managed entry already holding `full_path`.
    pub conflict_with: Option<EntryId>,
}

impl RunReport {
    /// True when nothing had to be written.
    pub fn is_noop(&self) -> bool {
        self.written.is_empty()
    }

    pub fn path_changed(&self) -> bool {
        self.written.contains(&EntryField::FullPath)
    }
}

/// Runs the recompute pipeline against a repository.
#[derive(Clone)]
pub struct PathResolver {
    repo: Arc<dyn ContentRepository>,
    config: Arc<EngineConfig>,
}

impl PathResolver {
    pub fn new(repo: Arc<dyn ContentRepository>, config: Arc<EngineConfig>) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<dyn ContentRepository> {
        &self.repo
    }

    /// Recomputes the derived path fields of one entry.
    pub async fn recompute(&self, id: &EntryId) -> PathResult<RunReport> {
        let repo = self.repo.as_ref();
        let entry = repo.get_entry(id).await?;
        if !self.config.is_managed(&entry.content_type) {
            debug!("{id}: content type {} is not managed, skipped", entry.content_type);
            return Ok(RunReport {
                entry_id: id.clone(),
                written: Vec::new(),
                slug_segment: entry.slug_segment.unwrap_or_default(),
                full_path: entry.full_path.unwrap_or_default(),
                superseded: None,
                conflict_with: None,
            });
        }

        let segment = SegmentAllocator::new(repo, &self.config)
            .allocate(&entry)
            .await?;
        let resolved = PathBuilder::new(repo)
            .build(&entry.id, entry.parent.as_ref(), &segment)
            .await?;

        let previous = entry.resolved_full_path();
        let path_changed = previous != Some(resolved.full_path.as_str());
        let meta = PathMeta {
            previous_paths: history::record(
                previous,
                &resolved.full_path,
                &entry.path_meta.previous_paths,
            ),
            path_chain: resolved.path_chain,
        };

        let mut updates = Vec::new();
        if entry.slug_segment.as_deref() != Some(segment.as_str()) {
            updates.push(FieldUpdate::SlugSegment(segment.clone()));
        }
        if meta != entry.path_meta {
            updates.push(FieldUpdate::PathMeta(meta));
        }
        if path_changed {
            updates.push(FieldUpdate::FullPath(resolved.full_path.clone()));
        }

        let mut written = Vec::with_capacity(updates.len());
        for update in updates {
            let field = update.field();
            repo.set_field(id, update).await?;
            written.push(field);
        }

        if written.is_empty() {
            debug!("{id}: path {} unchanged", resolved.full_path);
        } else {
            info!(
                "{id}: resolved {} (wrote {})",
                resolved.full_path,
                written
                    .iter()
                    .map(EntryField::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let conflict_with = match ConflictDetector::new(repo, &self.config.managed_content_type_ids)
            .detect(&resolved.full_path, id)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                warn!("{id}: conflict check skipped: {e}");
                None
            }
        };

        Ok(RunReport {
            entry_id: id.clone(),
            written,
            slug_segment: segment,
            full_path: resolved.full_path,
            superseded: if path_changed {
                previous.map(str::to_string)
            } else {
                None
            },
            conflict_with,
        })
    }
}
