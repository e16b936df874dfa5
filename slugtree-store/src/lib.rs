//! Content repository layer for slugtree.
//!
//! The path engine reads and writes entries exclusively through the
//! [`ContentRepository`] trait. Two implementations ship here:
//! - [`MemoryRepository`]: an in-process store used by the CLI and tests
//! - [`HttpRepository`]: a client for a JSON content delivery/management API
//!
//! Both validate entries at the boundary: what leaves this crate is always a
//! typed [`slugtree_model::Entry`].

mod error;
mod filter;
mod http;
mod memory;
mod repository;

pub use error::{StorageError, StorageResult};
pub use filter::{EntryFilter, ParentFilter};
pub use http::{HttpRepository, HttpRepositoryConfig};
pub use memory::{FieldWrite, MemoryRepository};
pub use repository::{ContentRepository, FieldUpdate};
