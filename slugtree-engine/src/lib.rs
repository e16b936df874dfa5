//! Hierarchical URL path engine.
//!
//! Keeps three derived fields of every managed entry up to date:
//! `slugSegment`, `fullPath` and `pathMeta` (`pathChain` + `previousPaths`).
//!
//! # Components
//!
//! - [`normalize`]: canonical path form
//! - [`slugify`]: title to ASCII segment
//! - [`SegmentAllocator`]: segment unique among siblings (`base`, `base-2`, …)
//! - [`PathBuilder`]: ancestor walk with cycle detection
//! - [`ConflictDetector`] / [`scan_conflicts`]: advisory global uniqueness checks
//! - [`history::record`]: append-only list of superseded paths
//! - [`PathResolver`]: one diff-before-write recompute run
//! - [`RecomputeCoordinator`]: debounced, single-flight runs driven by change events
//!
//! # Example
//!
//! ```no_run
//! use slugtree_engine::{EngineConfig, RecomputeCoordinator};
//! use slugtree_store::MemoryRepository;
//! use slugtree_types::ContentTypeId;
//! use std::sync::Arc;
//!
//! # async fn demo() -> slugtree_engine::PathResult<()> {
//! let repo = Arc::new(MemoryRepository::default());
//! let config = EngineConfig::with_managed_types([ContentTypeId::parse("page").unwrap()]);
//! let coordinator = RecomputeCoordinator::new(repo.clone(), config)?;
//!
//! let changes = repo.subscribe();
//! tokio::spawn(async move { coordinator.run_events(changes).await });
//! # Ok(())
//! # }
//! ```

mod allocator;
mod builder;
mod config;
mod conflict;
mod coordinator;
mod error;
pub mod history;
mod normalize;
mod recompute;
mod slug;

pub use allocator::{FALLBACK_SEGMENT, SegmentAllocator};
pub use builder::{PathBuilder, ResolvedPath};
pub use config::{EngineConfig, LocaleMode};
pub use conflict::{ConflictDetector, PathConflict, scan_conflicts};
pub use coordinator::{CoordinatorEvent, RecomputeCoordinator, RunState};
pub use error::{PathError, PathResult};
pub use normalize::{is_normalized, normalize};
pub use recompute::{PathResolver, RunReport};
pub use slug::slugify;
