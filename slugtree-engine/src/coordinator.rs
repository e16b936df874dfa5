//! Debounced, single-flight scheduling of recompute runs.
//!
//! Each entry moves through `Idle → Scheduled → Running → Idle`. Triggers
//! inside the debounce window restart it; a trigger that arrives while the
//! entry is running is remembered and scheduled once the run returns to idle.
//! Runs for different entries proceed independently.

use crate::recompute::{PathResolver, RunReport};
use crate::{EngineConfig, PathResult};
use slugtree_store::{ContentRepository, EntryFilter, ParentFilter};
use slugtree_types::{ChangeEvent, EntryId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 256;

/// Scheduling state of one entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Scheduled,
    Running,
}

/// Notifications for UI surfaces and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    Scheduled(EntryId),
    Started(EntryId),
    Completed(RunReport),
    /// The run succeeded but its full path is also held by another entry.
    ConflictWarning {
        entry_id: EntryId,
        full_path: String,
        conflict_with: EntryId,
    },
    /// The run was aborted. `message` is the user-facing text.
    Failed { entry_id: EntryId, message: String },
}

/// Tracking for an entry that is scheduled or running. Idle entries have none.
#[derive(Debug, Default)]
struct Slot {
    state: RunState,
    /// Stamp of the latest (re)schedule; a timer only fires for the latest one.
    generation: u64,
    rerun_requested: bool,
}

struct Inner {
    resolver: PathResolver,
    slots: Mutex<HashMap<EntryId, Slot>>,
    /// Source of slot generations, unique across the coordinator's lifetime.
    generations: AtomicU64,
    events: broadcast::Sender<CoordinatorEvent>,
}

/// Orchestrates recompute runs in response to change events.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct RecomputeCoordinator {
    inner: Arc<Inner>,
}

impl RecomputeCoordinator {
    /// Creates a coordinator. The configuration is validated first.
    pub fn new(repo: Arc<dyn ContentRepository>, config: EngineConfig) -> PathResult<Self> {
        config.validate()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            inner: Arc::new(Inner {
                resolver: PathResolver::new(repo, Arc::new(config)),
                slots: Mutex::new(HashMap::new()),
                generations: AtomicU64::new(0),
                events,
            }),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.inner.resolver.config()
    }

    /// Subscribes to coordinator notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.inner.events.subscribe()
    }

    /// Current scheduling state of an entry.
    pub fn state(&self, id: &EntryId) -> RunState {
        self.slots().get(id).map_or(RunState::Idle, |slot| slot.state)
    }

    /// Number of entries currently scheduled or running.
    pub fn active_entries(&self) -> usize {
        self.slots().len()
    }

    // ── Triggers ─────────────────────────────────────────────────

    /// Schedules a debounced recompute.
    ///
    /// Restarts the debounce window if one is pending. While a run is in
    /// progress the trigger is deferred until that run finishes.
    pub fn schedule(&self, id: &EntryId) {
        let generation = {
            let mut slots = self.slots();
            let slot = slots.entry(id.clone()).or_default();
            if slot.state == RunState::Running {
                slot.rerun_requested = true;
                debug!("{id}: run in progress, trigger deferred");
                return;
            }
            slot.state = RunState::Scheduled;
            slot.generation = self.next_generation();
            slot.generation
        };

        debug!("{id}: recompute scheduled");
        self.emit(CoordinatorEvent::Scheduled(id.clone()));

        let this = self.clone();
        let id = id.clone();
        let delay = self.config().debounce_interval();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if this.begin_run(&id, Some(generation)) {
                let _ = this.run(&id).await;
            }
        });
    }

    /// Runs immediately unless a run is already in progress.
    ///
    /// A pending debounce is cancelled. Returns `Ok(None)` when the trigger
    /// was deferred behind a running recompute.
    pub async fn recompute_now(&self, id: &EntryId) -> PathResult<Option<RunReport>> {
        if !self.begin_run(id, None) {
            return Ok(None);
        }
        self.run(id).await.map(Some)
    }

    /// Schedules a recompute for a change event if it concerns a managed
    /// entry's path inputs. Returns whether anything was scheduled.
    pub fn handle_event(&self, event: &ChangeEvent) -> bool {
        if !self.config().is_managed(&event.content_type) || !event.affects_path_inputs() {
            return false;
        }
        self.schedule(&event.entry_id);
        true
    }

    /// Consumes change events until the channel closes.
    pub async fn run_events(&self, mut events: broadcast::Receiver<ChangeEvent>) {
        info!("recompute coordinator listening for changes");
        loop {
            match events.recv().await {
                Ok(event) => {
                    self.handle_event(&event);
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("missed {missed} change events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!("change stream closed, coordinator stopped");
    }

    // ── Runs ─────────────────────────────────────────────────────

    /// Moves the entry to `Running` if allowed.
    ///
    /// With `Some(generation)` the call comes from a debounce timer and only
    /// succeeds for the latest schedule. With `None` it is an immediate run,
    /// which cancels any pending timer.
    fn begin_run(&self, id: &EntryId, generation: Option<u64>) -> bool {
        let mut slots = self.slots();
        match generation {
            Some(g) => match slots.get_mut(id) {
                Some(slot) if slot.state == RunState::Scheduled && slot.generation == g => {
                    slot.state = RunState::Running;
                    true
                }
                _ => false,
            },
            None => {
                let slot = slots.entry(id.clone()).or_default();
                if slot.state == RunState::Running {
                    slot.rerun_requested = true;
                    return false;
                }
                slot.generation = self.next_generation();
                slot.state = RunState::Running;
                true
            }
        }
    }

    /// Returns the entry to `Idle` and reports whether a rerun was requested.
    ///
    /// The slot is dropped; a requested rerun recreates it through `schedule`.
    fn finish_run(&self, id: &EntryId) -> bool {
        self.slots()
            .remove(id)
            .is_some_and(|slot| slot.rerun_requested)
    }

    fn next_generation(&self) -> u64 {
        self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn run(&self, id: &EntryId) -> PathResult<RunReport> {
        self.emit(CoordinatorEvent::Started(id.clone()));
        let result = self.inner.resolver.recompute(id).await;

        match &result {
            Ok(report) => {
                if let Some(other) = &report.conflict_with {
                    warn!(
                        "{id}: full path {} is also used by {other}",
                        report.full_path
                    );
                    self.emit(CoordinatorEvent::ConflictWarning {
                        entry_id: id.clone(),
                        full_path: report.full_path.clone(),
                        conflict_with: other.clone(),
                    });
                }
                self.emit(CoordinatorEvent::Completed(report.clone()));
            }
            Err(e) => {
                warn!("{id}: recompute failed: {e}");
                self.emit(CoordinatorEvent::Failed {
                    entry_id: id.clone(),
                    message: e.user_message(),
                });
            }
        }

        let rerun = self.finish_run(id);

        if let Ok(report) = &result {
            if report.path_changed() && self.config().cascade_to_children {
                self.schedule_children(id).await;
            }
        }
        if rerun {
            self.schedule(id);
        }
        result
    }

    /// Schedules every managed direct child of `id`.
    async fn schedule_children(&self, id: &EntryId) {
        let config = self.config();
        let filter = EntryFilter::new()
            .content_types(&config.managed_content_type_ids)
            .parent(ParentFilter::Equals(id.clone()));
        match self.inner.resolver.repository().query_entries(&filter).await {
            Ok(children) => {
                if !children.is_empty() {
                    debug!("{id}: cascading to {} children", children.len());
                }
                for child in children {
                    self.schedule(&child.id);
                }
            }
            Err(e) => warn!("{id}: could not load children for cascade: {e}"),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<EntryId, Slot>> {
        self.inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: CoordinatorEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}
