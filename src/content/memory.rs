//! In-memory entity store loaded from a JSON content document.
//!
//! # Document format
//!
//! ```json
//! {
//!   "taxonomies": ["genre"],
//!   "authors":  [{ "id": 1, "nicename": "jane" }],
//!   "terms":    [{ "id": 3, "taxonomy": "category", "slug": "news" }],
//!   "entities": [{ "id": 10, "slug": "hello", "published": "2024-01-15", "terms": [3] }]
//! }
//! ```
//!
//! `category` and `tag` are always registered.

use std::path::Path;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use super::entity::{Author, AuthorId, CATEGORY, Entity, EntityId, TAG, Term, TermId};
use super::store::{EntityFilter, EntityStore, Order, StoreError, TermConstraint};

/// Thread-safe in-memory store.
///
/// Entities keep insertion order, which is the natural order used to break
/// publication-time ties.
#[derive(Debug)]
pub struct MemoryStore {
    entities: RwLock<Vec<Entity>>,
    /// Entity id -> position in `entities`.
    positions: RwLock<FxHashMap<EntityId, usize>>,
    terms: RwLock<FxHashMap<TermId, Term>>,
    /// Entity id -> assigned term ids (all taxonomies).
    relationships: RwLock<FxHashMap<EntityId, FxHashSet<TermId>>>,
    authors: RwLock<FxHashMap<AuthorId, Author>>,
    taxonomies: RwLock<FxHashSet<String>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let taxonomies = [CATEGORY, TAG].into_iter().map(String::from).collect();
        Self {
            entities: RwLock::default(),
            positions: RwLock::default(),
            terms: RwLock::default(),
            relationships: RwLock::default(),
            authors: RwLock::default(),
            taxonomies: RwLock::new(taxonomies),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    taxonomies: Vec<String>,
    #[serde(default)]
    authors: Vec<Author>,
    #[serde(default)]
    terms: Vec<Term>,
    #[serde(default)]
    entities: Vec<EntityRecord>,
}

#[derive(Debug, Deserialize)]
struct EntityRecord {
    #[serde(flatten)]
    entity: Entity,
    #[serde(default)]
    terms: Vec<TermId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON content document.
    pub fn from_json(content: &str) -> Result<Self, StoreError> {
        let doc: Document = serde_json::from_str(content)?;
        let store = Self::new();

        for taxonomy in doc.taxonomies {
            store.register_taxonomy(taxonomy);
        }
        for author in doc.authors {
            store.insert_author(author);
        }
        for term in doc.terms {
            store.insert_term(term);
        }
        for record in doc.entities {
            let id = record.entity.id;
            store.insert_entity(record.entity);
            store.assign_terms(id, record.terms);
        }

        Ok(store)
    }

    /// Load a JSON content document from disk.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| StoreError::Io(path.to_path_buf(), err))?;
        Self::from_json(&content)
    }

    pub fn register_taxonomy(&self, taxonomy: impl Into<String>) {
        self.taxonomies.write().insert(taxonomy.into());
    }

    /// Insert or replace an entity. Replacing keeps its position.
    pub fn insert_entity(&self, entity: Entity) {
        let mut entities = self.entities.write();
        let mut positions = self.positions.write();
        match positions.get(&entity.id) {
            Some(&pos) => entities[pos] = entity,
            None => {
                positions.insert(entity.id, entities.len());
                entities.push(entity);
            }
        }
    }

    /// Insert or replace a term, registering its taxonomy.
    pub fn insert_term(&self, term: Term) {
        self.register_taxonomy(term.taxonomy.clone());
        self.terms.write().insert(term.id, term);
    }

    pub fn insert_author(&self, author: Author) {
        self.authors.write().insert(author.id, author);
    }

    /// Attach terms to an entity (added to existing assignments).
    pub fn assign_terms(&self, id: EntityId, terms: impl IntoIterator<Item = TermId>) {
        self.relationships
            .write()
            .entry(id)
            .or_default()
            .extend(terms);
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Check a term constraint against an entity's assignments.
    fn matches_terms(&self, id: EntityId, constraint: &TermConstraint) -> bool {
        let relationships = self.relationships.read();
        let terms = self.terms.read();
        let assigned: Vec<TermId> = relationships
            .get(&id)
            .map(|set| {
                set.iter()
                    .copied()
                    .filter(|t| terms.get(t).is_some_and(|t| t.taxonomy == constraint.taxonomy))
                    .collect()
            })
            .unwrap_or_default();

        if assigned.iter().any(|t| constraint.none_of.contains(t)) {
            return false;
        }
        match &constraint.any_of {
            Some(any_of) => assigned.iter().any(|t| any_of.contains(t)),
            None => true,
        }
    }
}

impl EntityStore for MemoryStore {
    fn get_entity(&self, id: EntityId) -> Option<Entity> {
        let pos = *self.positions.read().get(&id)?;
        self.entities.read().get(pos).cloned()
    }

    fn query_entities(
        &self,
        filter: &EntityFilter,
        order: Order,
        limit: usize,
    ) -> Result<Vec<Entity>, StoreError> {
        let mut matched: Vec<Entity> = self
            .entities
            .read()
            .iter()
            .filter(|e| e.kind == filter.kind)
            .filter(|e| filter.exclude != Some(e.id))
            .filter(|e| filter.published.is_none_or(|bound| bound.admits(e.published)))
            .filter(|e| filter.viewer.can_see(e))
            .filter(|e| {
                filter
                    .terms
                    .as_ref()
                    .is_none_or(|c| self.matches_terms(e.id, c))
            })
            .cloned()
            .collect();

        // Stable sorts: ties keep insertion order.
        match order {
            Order::PublishedAsc => matched.sort_by_key(|e| e.published),
            Order::PublishedDesc => matched.sort_by(|a, b| b.published.cmp(&a.published)),
        }
        matched.truncate(limit);
        Ok(matched)
    }

    fn object_terms(&self, id: EntityId, taxonomy: &str) -> Result<Vec<Term>, StoreError> {
        let relationships = self.relationships.read();
        let terms = self.terms.read();
        let mut result: Vec<Term> = relationships
            .get(&id)
            .map(|set| {
                set.iter()
                    .filter_map(|t| terms.get(t))
                    .filter(|t| t.taxonomy == taxonomy)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        result.sort_by_key(|t| t.id);
        Ok(result)
    }

    fn get_term(&self, id: TermId) -> Option<Term> {
        self.terms.read().get(&id).cloned()
    }

    fn get_author(&self, id: AuthorId) -> Option<Author> {
        self.authors.read().get(&id).cloned()
    }

    fn taxonomy_exists(&self, taxonomy: &str) -> bool {
        self.taxonomies.read().contains(taxonomy)
    }

    fn all_entities(&self) -> Vec<Entity> {
        self.entities.read().clone()
    }
}
