//! Entity source abstraction.
//!
//! Link resolution and the adjacency query only ever read content through
//! [`EntityStore`]. The store owns the records; callers get clones.

use std::path::PathBuf;

use thiserror::Error;

use super::entity::{Author, AuthorId, Entity, EntityId, EntityKind, Status, Term, TermId};

/// Errors raised by an entity store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("content document is malformed")]
    Parse(#[from] serde_json::Error),

    #[error("store query failed: {0}")]
    Backend(String),
}

/// Who is asking. Decides whether private entities are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Viewer {
    /// Authenticated user, `None` for anonymous requests.
    pub user: Option<AuthorId>,
    /// Holds the capability to read every private entity.
    pub read_private: bool,
}

impl Viewer {
    pub const ANONYMOUS: Self = Self {
        user: None,
        read_private: false,
    };

    pub fn user(id: AuthorId) -> Self {
        Self {
            user: Some(id),
            read_private: false,
        }
    }

    pub fn with_read_private(mut self, read_private: bool) -> Self {
        self.read_private = read_private;
        self
    }

    /// Check whether an entity is visible to this viewer.
    ///
    /// Published entities always are; private ones only to an
    /// authenticated owner or a viewer with the read-private capability.
    pub fn can_see(&self, entity: &Entity) -> bool {
        match entity.status {
            Status::Published => true,
            Status::Private => match self.user {
                Some(user) => self.read_private || entity.author == Some(user),
                None => false,
            },
            _ => false,
        }
    }
}

/// Strict bound on the publication timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    Before(i64),
    After(i64),
}

impl TimeBound {
    #[inline]
    pub fn admits(self, published: i64) -> bool {
        match self {
            Self::Before(t) => published < t,
            Self::After(t) => published > t,
        }
    }
}

/// Taxonomy membership constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermConstraint {
    pub taxonomy: String,
    /// Entity must carry at least one of these terms (ignored when `None`).
    pub any_of: Option<Vec<TermId>>,
    /// Entity must carry none of these terms.
    pub none_of: Vec<TermId>,
}

/// Query filter for [`EntityStore::query_entities`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFilter {
    pub kind: EntityKind,
    pub published: Option<TimeBound>,
    pub exclude: Option<EntityId>,
    pub viewer: Viewer,
    pub terms: Option<TermConstraint>,
}

impl EntityFilter {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            published: None,
            exclude: None,
            viewer: Viewer::ANONYMOUS,
            terms: None,
        }
    }
}

/// Result ordering for [`EntityStore::query_entities`].
///
/// Ties keep the store's natural order in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    PublishedAsc,
    PublishedDesc,
}

/// Read interface to the external content store.
pub trait EntityStore: Send + Sync {
    fn get_entity(&self, id: EntityId) -> Option<Entity>;

    /// Filtered, ordered, limited entity query. The one round trip the
    /// adjacency lookup makes.
    fn query_entities(
        &self,
        filter: &EntityFilter,
        order: Order,
        limit: usize,
    ) -> Result<Vec<Entity>, StoreError>;

    /// Terms of an entity in one taxonomy, ordered by term id.
    fn object_terms(&self, id: EntityId, taxonomy: &str) -> Result<Vec<Term>, StoreError>;

    fn get_term(&self, id: TermId) -> Option<Term>;

    fn get_author(&self, id: AuthorId) -> Option<Author>;

    fn taxonomy_exists(&self, taxonomy: &str) -> bool;

    /// Every stored entity, in natural order.
    fn all_entities(&self) -> Vec<Entity>;
}
