//! Full path assembly by walking the ancestor chain.

use crate::normalize::normalize;
use crate::slug::slugify;
use crate::{PathError, PathResult};
use slugtree_model::Entry;
use slugtree_store::ContentRepository;
use slugtree_types::EntryId;

/// Result of a successful path build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub full_path: String,
    /// Ancestors used to build the path, nearest first.
    pub path_chain: Vec<EntryId>,
}

/// Walks ancestors to produce an entry's full path.
pub struct PathBuilder<'a> {
    repo: &'a dyn ContentRepository,
}

impl<'a> PathBuilder<'a> {
    pub fn new(repo: &'a dyn ContentRepository) -> Self {
        Self { repo }
    }

    /// Builds the full path for `entry_id` placed under `parent` with `segment`.
    ///
    /// The nearest ancestor with a resolved full path supplies the prefix;
    /// closer unresolved ancestors contribute their segments. The walk still
    /// follows parent references up to the root so that a loop through an
    /// already-resolved ancestor is reported as [`PathError::CycleDetected`].
    /// Nothing is written.
    pub async fn build(
        &self,
        entry_id: &EntryId,
        parent: Option<&EntryId>,
        segment: &str,
    ) -> PathResult<ResolvedPath> {
        let mut visited: Vec<EntryId> = Vec::new();
        let mut path_chain = Vec::new();
        let mut segments = Vec::new(); // nearest first
        let mut prefix: Option<String> = None;
        let mut cursor = parent.cloned();

        while let Some(id) = cursor {
            if &id == entry_id || visited.contains(&id) {
                return Err(PathError::CycleDetected {
                    entry: entry_id.clone(),
                    ancestor: id,
                });
            }
            visited.push(id.clone());

            let ancestor = self.repo.get_entry(&id).await?;
            if prefix.is_none() {
                path_chain.push(id);
                match ancestor.resolved_full_path() {
                    Some(path) => prefix = Some(path.to_string()),
                    None => segments.push(ancestor_segment(&ancestor)),
                }
            }
            cursor = ancestor.parent;
        }

        let mut path = prefix.unwrap_or_default();
        for seg in segments.iter().rev() {
            path.push('/');
            path.push_str(seg);
        }
        path.push('/');
        path.push_str(segment);

        Ok(ResolvedPath {
            full_path: normalize(&path),
            path_chain,
        })
    }
}

/// An unresolved ancestor's own segment; its title when none is stored yet.
fn ancestor_segment(ancestor: &Entry) -> String {
    match ancestor.slug_segment.as_deref() {
        Some(seg) => seg.to_string(),
        None => slugify(&ancestor.title),
    }
}
