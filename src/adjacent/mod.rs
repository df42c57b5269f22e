//! Adjacent-entity query (previous/next navigation).
//!
//! This module provides:
//! - `query`: [`AdjacentQuery`], the lookup and its link helper
//! - `key`: [`AdjacencyQueryKey`], the cache key derivation
//! - `cache`: [`ObjectCache`] collaborator and the in-process [`MemoryCache`]
//!
//! Cached answers are not invalidated when entities change. A cached entity
//! that is gone or hidden from the viewer is queried again; any other change
//! needs the caller to flush [`BUCKET`].

mod cache;
mod key;
mod query;

pub use cache::{MemoryCache, ObjectCache};
pub use key::AdjacencyQueryKey;
pub use query::{AdjacencyConstraints, AdjacentQuery, BUCKET, Boundary, Direction};
