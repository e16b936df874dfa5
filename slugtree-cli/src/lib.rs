//! Offline path resolution over a JSON entry snapshot.
//!
//! A snapshot is a JSON array of raw entries (`{"sys": {...}, "fields": {...}}`),
//! the same shape the HTTP content API returns for a single entry.

use anyhow::{Context, Result};
use serde::Serialize;
use slugtree_engine::{EngineConfig, PathConflict, PathError, PathResolver, RunReport, scan_conflicts};
use slugtree_model::{Entry, RawEntry};
use slugtree_store::{MemoryRepository, StorageError};
use slugtree_types::{ContentTypeId, EntryId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Managed content type when neither a config file nor `--content-type` names one.
pub const DEFAULT_CONTENT_TYPE: &str = "page";

/// An entry that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub entry_id: EntryId,
    pub message: String,
}

/// Outcome of resolving a whole snapshot.
#[derive(Debug, Default, Serialize)]
pub struct ResolveSummary {
    pub reports: Vec<RunReport>,
    pub failures: Vec<Failure>,
}

impl ResolveSummary {
    /// Number of entries whose derived fields were written.
    pub fn changed(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_noop()).count()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &RunReport> {
        self.reports.iter().filter(|r| r.conflict_with.is_some())
    }
}

/// Builds the engine configuration for a CLI run.
///
/// `content_types`, when given, replaces the managed set from the file.
pub fn load_config(path: Option<&Path>, content_types: &[String]) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::with_managed_types([ContentTypeId::parse(DEFAULT_CONTENT_TYPE)?]),
    };

    if !content_types.is_empty() {
        config.managed_content_type_ids = content_types
            .iter()
            .map(|s| ContentTypeId::parse(s))
            .collect::<Result<_, _>>()
            .context("invalid --content-type")?;
    }
    config.validate()?;
    Ok(config)
}

/// Reads a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Vec<RawEntry>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of entries", path.display()))
}

/// Orders entries so that every parent comes before its children.
///
/// Entries whose parent is outside the set start a tree of their own.
/// Entries caught in a parent loop are appended last in input order.
pub fn resolution_order(entries: &[Entry]) -> Vec<EntryId> {
    let known: HashSet<&EntryId> = entries.iter().map(|e| &e.id).collect();
    let mut children: HashMap<&EntryId, Vec<&EntryId>> = HashMap::new();
    let mut queue = VecDeque::new();

    for entry in entries {
        match entry.parent.as_ref().filter(|p| known.contains(p)) {
            Some(parent) => children.entry(parent).or_default().push(&entry.id),
            None => queue.push_back(&entry.id),
        }
    }

    let mut seen = HashSet::new();
    let mut order = Vec::with_capacity(entries.len());
    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        order.push(id.clone());
        if let Some(kids) = children.get(id) {
            queue.extend(kids.iter().copied());
        }
    }

    for entry in entries {
        if seen.insert(&entry.id) {
            order.push(entry.id.clone());
        }
    }
    order
}

/// A snapshot loaded into an in-memory repository.
pub struct Snapshot {
    repo: Arc<MemoryRepository>,
    config: EngineConfig,
    /// Input order, used when writing the snapshot back.
    original: Vec<RawEntry>,
    order: Vec<EntryId>,
    invalid: Vec<Failure>,
}

impl Snapshot {
    /// Loads raw entries. Managed entries that fail validation are kept out
    /// of the repository and reported as failures.
    pub fn new(raw: Vec<RawEntry>, config: EngineConfig) -> Self {
        let mapping = &config.field_mapping;
        let mut stored = Vec::with_capacity(raw.len());
        let mut managed = Vec::new();
        let mut invalid = Vec::new();

        for entry in &raw {
            if !config.is_managed(&entry.sys.content_type) {
                stored.push(entry.clone());
                continue;
            }
            match Entry::from_raw(entry, mapping) {
                Ok(typed) => {
                    managed.push(typed);
                    stored.push(entry.clone());
                }
                Err(e) => {
                    warn!("{}: skipped, {e}", entry.sys.id);
                    invalid.push(Failure {
                        entry_id: entry.sys.id.clone(),
                        message: PathError::Repository(StorageError::Validation(e)).user_message(),
                    });
                }
            }
        }

        debug!(
            "snapshot: {} entries, {} managed, {} invalid",
            raw.len(),
            managed.len(),
            invalid.len()
        );

        Self {
            repo: Arc::new(MemoryRepository::with_entries(mapping.clone(), stored)),
            order: resolution_order(&managed),
            config,
            original: raw,
            invalid,
        }
    }

    pub fn load(path: &Path, config: EngineConfig) -> Result<Self> {
        Ok(Self::new(load_snapshot(path)?, config))
    }

    pub fn repository(&self) -> &Arc<MemoryRepository> {
        &self.repo
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recomputes every managed entry, parents first.
    pub async fn resolve(&self) -> ResolveSummary {
        let resolver = PathResolver::new(self.repo.clone(), Arc::new(self.config.clone()));
        let mut summary = ResolveSummary {
            failures: self.invalid.clone(),
            ..ResolveSummary::default()
        };

        for id in &self.order {
            match resolver.recompute(id).await {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    warn!("{id}: {e}");
                    summary.failures.push(Failure {
                        entry_id: id.clone(),
                        message: e.user_message(),
                    });
                }
            }
        }

        info!(
            "resolved {} entries: {} changed, {} failed",
            summary.reports.len(),
            summary.changed(),
            summary.failures.len()
        );
        summary
    }

    /// Full paths shared by more than one managed entry.
    pub async fn check(&self) -> Result<Vec<PathConflict>> {
        scan_conflicts(self.repo.as_ref(), &self.config.managed_content_type_ids)
            .await
            .context("conflict scan failed")
    }

    /// Current entries in input order. Skipped entries are returned unchanged.
    pub async fn entries(&self) -> Vec<RawEntry> {
        let mut out = Vec::with_capacity(self.original.len());
        for raw in &self.original {
            match self.repo.raw_entry(&raw.sys.id).await {
                Some(current) => out.push(current),
                None => out.push(raw.clone()),
            }
        }
        out
    }

    /// Writes the current entries as pretty-printed JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries().await)?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("snapshot written to {}", path.display());
        Ok(())
    }
}
