//! Shared test helpers for engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use slugtree_engine::EngineConfig;
use slugtree_model::{Entry, EntrySys};
use slugtree_store::{
    ContentRepository, EntryFilter, FieldUpdate, MemoryRepository, StorageResult,
};
use slugtree_types::{ContentTypeId, EntryId};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn id(s: &str) -> EntryId {
    EntryId::parse(s).unwrap()
}

pub fn page() -> ContentTypeId {
    ContentTypeId::parse("page").unwrap()
}

pub fn asset() -> ContentTypeId {
    ContentTypeId::parse("asset").unwrap()
}

/// Config managing `page` with default timings.
pub fn config() -> EngineConfig {
    EngineConfig::with_managed_types([page()])
}

/// A fresh page entry with only a title.
pub fn entry(entry_id: &str, title: &str) -> Entry {
    Entry::new(id(entry_id), page(), title)
}

/// An entry that already went through one successful run.
pub fn resolved(entry_id: &str, title: &str, segment: &str, full_path: &str) -> Entry {
    entry(entry_id, title)
        .with_slug_segment(segment)
        .with_full_path(full_path)
}

pub async fn repo_with(entries: &[Entry]) -> Arc<MemoryRepository> {
    let repo = Arc::new(MemoryRepository::default());
    for e in entries {
        repo.insert(e).await;
    }
    repo
}

/// Wraps a [`MemoryRepository`] and delays every `get_entry` call.
///
/// Keeps a run in the `Running` state long enough for a test to trigger
/// again mid-run.
pub struct SlowRepository {
    pub inner: Arc<MemoryRepository>,
    pub delay: Duration,
    pub reads: AtomicUsize,
}

impl SlowRepository {
    pub fn new(inner: Arc<MemoryRepository>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentRepository for SlowRepository {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn get_entry(&self, id: &EntryId) -> StorageResult<Entry> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.get_entry(id).await
    }

    async fn query_entries(&self, filter: &EntryFilter) -> StorageResult<Vec<Entry>> {
        self.inner.query_entries(filter).await
    }

    async fn set_field(&self, id: &EntryId, update: FieldUpdate) -> StorageResult<()> {
        self.inner.set_field(id, update).await
    }

    async fn get_sys(&self, id: &EntryId) -> StorageResult<EntrySys> {
        self.inner.get_sys(id).await
    }
}
