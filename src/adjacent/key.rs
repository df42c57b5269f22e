//! Adjacency cache key.

use std::collections::BTreeSet;

use crate::content::{EntityKind, TermId, Viewer};
use crate::utils::hash;

use super::Direction;

/// Every input that can change an adjacency answer.
///
/// The viewer is part of the key: private entities visible to one user
/// must never be served to another from cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdjacencyQueryKey<'a> {
    pub direction: Direction,
    pub same_term: bool,
    /// Terms of the current entity after exclusions (sorted by id).
    pub terms: &'a [TermId],
    pub excluded: &'a BTreeSet<TermId>,
    pub published: i64,
    pub kind: &'a EntityKind,
    pub taxonomy: &'a str,
    pub viewer: Viewer,
}

impl AdjacencyQueryKey<'_> {
    /// `adjacent:<16 hex digits>`.
    pub fn cache_key(&self) -> String {
        format!("adjacent:{}", hash::fingerprint(self))
    }
}
