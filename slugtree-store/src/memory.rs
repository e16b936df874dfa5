//! In-memory content repository.
//!
//! Holds raw field bags, so entries go through the same validation as those
//! fetched from a remote store. `get_entry` fails on an invalid entry; queries
//! leave invalid entries out. Every field write and external edit is
//! broadcast as a [`ChangeEvent`].

use crate::{ContentRepository, EntryFilter, FieldUpdate, StorageError, StorageResult};
use async_trait::async_trait;
use serde_json::{Value, json};
use slugtree_model::{Entry, EntrySys, FieldMapping, RawEntry};
use slugtree_types::{ChangeEvent, EntryField, EntryId};
use std::collections::HashSet;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};

const EVENT_CAPACITY: usize = 256;

/// A field write recorded by [`MemoryRepository`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWrite {
    pub entry_id: EntryId,
    pub field: EntryField,
    pub value: Value,
}

/// In-process [`ContentRepository`] keeping entries in insertion order.
pub struct MemoryRepository {
    mapping: FieldMapping,
    entries: RwLock<Vec<RawEntry>>,
    writes: RwLock<Vec<FieldWrite>>,
    failing: RwLock<HashSet<EntryField>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new(FieldMapping::default())
    }
}

impl MemoryRepository {
    /// Creates an empty repository using the given field mapping.
    pub fn new(mapping: FieldMapping) -> Self {
        Self::with_entries(mapping, Vec::new())
    }

    /// Creates a repository pre-populated with raw entries. No events are emitted.
    pub fn with_entries(mapping: FieldMapping, entries: Vec<RawEntry>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            mapping,
            entries: RwLock::new(entries),
            writes: RwLock::new(Vec::new()),
            failing: RwLock::new(HashSet::new()),
            events,
        }
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Subscribes to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    /// Adds (or replaces) a raw entry and emits a `Created` event.
    pub async fn insert_raw(&self, raw: RawEntry) {
        let event = ChangeEvent::created(raw.sys.id.clone(), raw.sys.content_type.clone());
        {
            let mut entries = self.entries.write().await;
            match entries.iter_mut().find(|e| e.sys.id == raw.sys.id) {
                Some(existing) => *existing = raw,
                None => entries.push(raw),
            }
        }
        self.emit(event);
    }

    /// Adds a typed entry and emits a `Created` event.
    pub async fn insert(&self, entry: &Entry) {
        self.insert_raw(entry.to_raw(&self.mapping)).await;
    }

    /// Edits the title, as an editor would.
    pub async fn update_title(&self, id: &EntryId, title: &str) -> StorageResult<()> {
        self.edit(id, EntryField::Title, json!(title)).await
    }

    /// Moves the entry under a new parent, or to the root with `None`.
    pub async fn update_parent(&self, id: &EntryId, parent: Option<&EntryId>) -> StorageResult<()> {
        let value = parent.map_or(Value::Null, |p| json!(p.as_str()));
        self.edit(id, EntryField::Parent, value).await
    }

    /// Makes every subsequent write to `field` fail with a network error.
    pub async fn fail_writes_to(&self, field: EntryField) {
        self.failing.write().await.insert(field);
    }

    pub async fn clear_failures(&self) {
        self.failing.write().await.clear();
    }

    /// All writes performed through [`ContentRepository::set_field`], oldest first.
    pub async fn writes(&self) -> Vec<FieldWrite> {
        self.writes.read().await.clone()
    }

    pub async fn clear_writes(&self) {
        self.writes.write().await.clear();
    }

    /// Current raw form of one entry.
    pub async fn raw_entry(&self, id: &EntryId) -> Option<RawEntry> {
        self.entries.read().await.iter().find(|e| &e.sys.id == id).cloned()
    }

    /// Current raw form of every entry, in insertion order.
    pub async fn snapshot(&self) -> Vec<RawEntry> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn edit(&self, id: &EntryId, field: EntryField, value: Value) -> StorageResult<()> {
        let event = {
            let mut entries = self.entries.write().await;
            let raw = entries
                .iter_mut()
                .find(|e| &e.sys.id == id)
                .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
            raw.set(self.mapping.field_id(field), value);
            ChangeEvent::field_changed(id.clone(), raw.sys.content_type.clone(), field)
        };
        self.emit(event);
        Ok(())
    }

    fn emit(&self, event: ChangeEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_entry(&self, id: &EntryId) -> StorageResult<Entry> {
        let entries = self.entries.read().await;
        let raw = entries
            .iter()
            .find(|e| &e.sys.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        Ok(Entry::from_raw(raw, &self.mapping)?)
    }

    async fn query_entries(&self, filter: &EntryFilter) -> StorageResult<Vec<Entry>> {
        let entries = self.entries.read().await;
        let mut matched = Vec::new();
        for raw in entries.iter() {
            if filter.limit.is_some_and(|limit| matched.len() >= limit) {
                break;
            }
            if !filter.content_types.is_empty()
                && !filter.content_types.contains(&raw.sys.content_type)
            {
                continue;
            }
            let entry = match Entry::from_raw(raw, &self.mapping) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("memory store: skipping {} in query: {e}", raw.sys.id);
                    continue;
                }
            };
            if filter.matches(&entry) {
                matched.push(entry);
            }
        }
        Ok(matched)
    }

    async fn set_field(&self, id: &EntryId, update: FieldUpdate) -> StorageResult<()> {
        let field = update.field();
        if self.failing.read().await.contains(&field) {
            return Err(StorageError::Network(format!(
                "write to '{}' on {id} failed",
                self.mapping.field_id(field)
            )));
        }

        let value = update.to_value();
        self.edit(id, field, value.clone()).await?;
        debug!("memory store: {id}.{field} updated");

        self.writes.write().await.push(FieldWrite {
            entry_id: id.clone(),
            field,
            value,
        });
        Ok(())
    }

    async fn get_sys(&self, id: &EntryId) -> StorageResult<EntrySys> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| &e.sys.id == id)
            .map(|e| e.sys.clone())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
