//! Sibling-unique segment allocation.

use crate::slug::slugify;
use crate::{EngineConfig, PathError, PathResult};
use slugtree_model::Entry;
use slugtree_store::{ContentRepository, EntryFilter, ParentFilter};
use slugtree_types::EntryField;
use tracing::debug;

/// Segment used when neither slug, title nor id yield any URL-safe text.
pub const FALLBACK_SEGMENT: &str = "entry";

/// Picks a segment that no managed sibling uses.
///
/// Siblings share the entry's parent reference; roots are siblings of every
/// other root. Read-only.
pub struct SegmentAllocator<'a> {
    repo: &'a dyn ContentRepository,
    config: &'a EngineConfig,
}

impl<'a> SegmentAllocator<'a> {
    pub fn new(repo: &'a dyn ContentRepository, config: &'a EngineConfig) -> Self {
        Self { repo, config }
    }

    /// The segment tried first: the entry's own slug if set, else its title.
    ///
    /// Both are passed through [`slugify`]. When that leaves nothing, the
    /// slugified entry id is used, and [`FALLBACK_SEGMENT`] when even that
    /// is empty. Never returns an empty segment.
    pub fn base_candidate(entry: &Entry) -> String {
        entry
            .slug_segment
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(slugify(&entry.title)).filter(|s| !s.is_empty()))
            .or_else(|| Some(slugify(entry.id.as_str())).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| FALLBACK_SEGMENT.to_string())
    }

    /// Returns the first free candidate of `base`, `base-2`, `base-3`, …
    pub async fn allocate(&self, entry: &Entry) -> PathResult<String> {
        let base = Self::base_candidate(entry);
        if self.is_free(entry, &base).await? {
            return Ok(base);
        }

        let attempts = self.config.max_disambiguation_attempts;
        for n in 2..2u64 + u64::from(attempts) {
            let candidate = format!("{base}-{n}");
            if self.is_free(entry, &candidate).await? {
                debug!("{}: '{base}' taken, using '{candidate}'", entry.id);
                return Ok(candidate);
            }
        }

        Err(PathError::AllocationExhausted {
            entry: entry.id.clone(),
            base,
            attempts,
        })
    }

    async fn is_free(&self, entry: &Entry, candidate: &str) -> PathResult<bool> {
        let filter = EntryFilter::new()
            .content_types(&self.config.managed_content_type_ids)
            .parent(ParentFilter::siblings_of(entry.parent.as_ref()))
            .field_eq(EntryField::SlugSegment, candidate)
            .excluding(&entry.id)
            .limit(1)
            .select([EntryField::SlugSegment]);
        Ok(self.repo.query_entries(&filter).await?.is_empty())
    }
}
