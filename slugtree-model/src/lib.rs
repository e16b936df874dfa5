//! Entry model for slugtree.
//!
//! Defines the types the path engine and every content store agree on:
//! - [`Entry`]: a typed, validated view of one content entry
//! - [`RawEntry`]: the store's keyed field bag, as fetched
//! - [`FieldMapping`]: which store field holds each logical field
//! - [`PathMeta`]: the ancestor chain and the append-only path history
//!
//! Stores hand out [`RawEntry`] values; [`Entry::from_raw`] is the single
//! place where the field bag is checked, so the engine never performs keyed
//! lookups itself.

mod entry;
mod error;
mod schema;

pub use entry::{Entry, EntrySys, PathMeta, RawEntry};
pub use error::{ValidationError, ValidationResult};
pub use schema::FieldMapping;
