//! Previous/next entity lookup.
//!
//! One store round trip per distinct question: the answer (an entity id or
//! the empty marker) is parked in an [`ObjectCache`] under a key derived
//! from every input that can change it.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::cache::ObjectCache;
use super::key::AdjacencyQueryKey;
use crate::content::{
    CATEGORY, Entity, EntityFilter, EntityStore, Order, StoreError, TermConstraint, TermId,
    TimeBound, Viewer,
};
use crate::debug;
use crate::hooks::{FilterArgs, names};
use crate::permalink::{LinkAssembler, LinkRequest};

/// Cache bucket for adjacency answers.
pub const BUCKET: &str = "adjacent-entities";

/// Stored when no adjacent entity exists.
const EMPTY: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }

    const fn hook(self) -> &'static str {
        match self {
            Self::Previous => names::PREVIOUS_POST_LINK,
            Self::Next => names::NEXT_POST_LINK,
        }
    }
}

/// Oldest or newest entity of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyConstraints {
    /// Candidate must share at least one term with the current entity.
    pub same_term: bool,
    /// Candidate must carry none of these terms.
    pub excluded_terms: BTreeSet<TermId>,
    pub taxonomy: String,
}

impl Default for AdjacencyConstraints {
    fn default() -> Self {
        Self {
            same_term: false,
            excluded_terms: BTreeSet::new(),
            taxonomy: CATEGORY.to_string(),
        }
    }
}

impl AdjacencyConstraints {
    fn is_unconstrained(&self) -> bool {
        !self.same_term && self.excluded_terms.is_empty()
    }
}

/// Term scope derived from the constraints and the current entity.
enum Scope {
    /// No answer can exist; skip the store.
    Empty,
    Terms {
        /// Terms the candidate must share, sorted by id.
        shared: Vec<TermId>,
        constraint: Option<TermConstraint>,
    },
}

pub struct AdjacentQuery {
    store: Arc<dyn EntityStore>,
    cache: Arc<dyn ObjectCache>,
}

impl AdjacentQuery {
    pub fn new(store: Arc<dyn EntityStore>, cache: Arc<dyn ObjectCache>) -> Self {
        Self { store, cache }
    }

    /// Entity published right before or after `current`.
    ///
    /// Only entities of the same kind that `viewer` can see qualify. Store
    /// errors propagate and are never cached.
    pub fn find_adjacent(
        &self,
        current: &Entity,
        direction: Direction,
        constraints: &AdjacencyConstraints,
        viewer: Viewer,
    ) -> Result<Option<Entity>, StoreError> {
        let Scope::Terms { shared, constraint } = self.scope(current, constraints)? else {
            return Ok(None);
        };

        let key = AdjacencyQueryKey {
            direction,
            same_term: constraints.same_term,
            terms: &shared,
            excluded: &constraints.excluded_terms,
            published: current.published,
            kind: &current.kind,
            taxonomy: &constraints.taxonomy,
            viewer,
        }
        .cache_key();

        if let Some(cached) = self.cache.get(&key, BUCKET) {
            if cached == EMPTY {
                debug!("cache"; "hit {} (none)", key);
                return Ok(None);
            }
            match cached.parse() {
                Ok(id) => match self.store.get_entity(id).filter(|e| viewer.can_see(e)) {
                    Some(entity) => {
                        debug!("cache"; "hit {} -> {}", key, id);
                        return Ok(Some(entity));
                    }
                    None => debug!("cache"; "stale {} -> {}, refetching", key, id),
                },
                Err(_) => debug!("cache"; "unreadable value '{}' under {}, refetching", cached, key),
            }
        } else {
            debug!("cache"; "miss {}", key);
        }

        let (bound, order) = match direction {
            Direction::Next => (TimeBound::After(current.published), Order::PublishedAsc),
            Direction::Previous => (TimeBound::Before(current.published), Order::PublishedDesc),
        };
        let filter = EntityFilter {
            published: Some(bound),
            exclude: Some(current.id),
            viewer,
            terms: constraint,
            ..EntityFilter::new(current.kind.clone())
        };

        let found = self.store.query_entities(&filter, order, 1)?.into_iter().next();
        let value = found.as_ref().map(|e| e.id.to_string()).unwrap_or_default();
        self.cache.set(&key, &value, BUCKET);

        debug!(
            "adjacent";
            "{} of {}: {}",
            direction.as_str(),
            current.id,
            found.as_ref().map_or_else(|| "none".to_string(), |e| e.id.to_string())
        );
        Ok(found)
    }

    /// Oldest or newest visible entity of `current`'s kind within the same
    /// term scope. Not cached.
    pub fn find_boundary(
        &self,
        current: &Entity,
        boundary: Boundary,
        constraints: &AdjacencyConstraints,
        viewer: Viewer,
    ) -> Result<Option<Entity>, StoreError> {
        let Scope::Terms { constraint, .. } = self.scope(current, constraints)? else {
            return Ok(None);
        };

        let order = match boundary {
            Boundary::First => Order::PublishedAsc,
            Boundary::Last => Order::PublishedDesc,
        };
        let filter = EntityFilter {
            viewer,
            terms: constraint,
            ..EntityFilter::new(current.kind.clone())
        };
        Ok(self.store.query_entities(&filter, order, 1)?.into_iter().next())
    }

    /// Permalink of the adjacent entity, passed through the
    /// `previous_post_link` / `next_post_link` filter.
    pub fn adjacent_link(
        &self,
        links: &LinkAssembler,
        current: &Entity,
        direction: Direction,
        constraints: &AdjacencyConstraints,
        viewer: Viewer,
    ) -> Result<Option<String>, StoreError> {
        let Some(adjacent) = self.find_adjacent(current, direction, constraints, viewer)? else {
            return Ok(None);
        };
        let Some(url) = links.link(LinkRequest::entity(&adjacent)) else {
            return Ok(None);
        };
        let args = FilterArgs::new(direction.as_str()).entity(adjacent.id);
        Ok(Some(links.hooks().apply_filter(direction.hook(), url, &args)))
    }

    fn scope(
        &self,
        current: &Entity,
        constraints: &AdjacencyConstraints,
    ) -> Result<Scope, StoreError> {
        if constraints.is_unconstrained() {
            return Ok(Scope::Terms {
                shared: Vec::new(),
                constraint: None,
            });
        }
        if !self.store.taxonomy_exists(&constraints.taxonomy) {
            debug!("adjacent"; "unknown taxonomy '{}'", constraints.taxonomy);
            return Ok(Scope::Empty);
        }

        let mut shared = Vec::new();
        if constraints.same_term {
            shared = self
                .store
                .object_terms(current.id, &constraints.taxonomy)?
                .into_iter()
                .map(|t| t.id)
                .filter(|id| !constraints.excluded_terms.contains(id))
                .collect();
            if shared.is_empty() {
                return Ok(Scope::Empty);
            }
            shared.sort_unstable();
            shared.dedup();
        }

        let constraint = TermConstraint {
            taxonomy: constraints.taxonomy.clone(),
            any_of: constraints.same_term.then(|| shared.clone()),
            none_of: constraints.excluded_terms.iter().copied().collect(),
        };
        Ok(Scope::Terms {
            shared,
            constraint: Some(constraint),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::adjacent::MemoryCache;
    use crate::config::test_parse_config;
    use crate::content::{Author, AuthorId, EntityId, MemoryStore, Status, Term};
    use crate::hooks::HookRegistry;

    /// Counts `query_entities` round trips.
    struct CountingStore {
        inner: MemoryStore,
        queries: AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                queries: AtomicUsize::new(0),
            }
        }

        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    impl EntityStore for CountingStore {
        fn get_entity(&self, id: EntityId) -> Option<Entity> {
            self.inner.get_entity(id)
        }

        fn query_entities(
            &self,
            filter: &EntityFilter,
            order: Order,
            limit: usize,
        ) -> Result<Vec<Entity>, StoreError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.query_entities(filter, order, limit)
        }

        fn object_terms(&self, id: EntityId, taxonomy: &str) -> Result<Vec<Term>, StoreError> {
            self.inner.object_terms(id, taxonomy)
        }

        fn get_term(&self, id: TermId) -> Option<Term> {
            self.inner.get_term(id)
        }

        fn get_author(&self, id: AuthorId) -> Option<Author> {
            self.inner.get_author(id)
        }

        fn taxonomy_exists(&self, taxonomy: &str) -> bool {
            self.inner.taxonomy_exists(taxonomy)
        }

        fn all_entities(&self) -> Vec<Entity> {
            self.inner.all_entities()
        }
    }

    /// Always fails to query.
    struct BrokenStore(MemoryStore);

    impl EntityStore for BrokenStore {
        fn get_entity(&self, id: EntityId) -> Option<Entity> {
            self.0.get_entity(id)
        }

        fn query_entities(&self, _: &EntityFilter, _: Order, _: usize) -> Result<Vec<Entity>, StoreError> {
            Err(StoreError::Backend("connection reset".into()))
        }

        fn object_terms(&self, id: EntityId, taxonomy: &str) -> Result<Vec<Term>, StoreError> {
            self.0.object_terms(id, taxonomy)
        }

        fn get_term(&self, id: TermId) -> Option<Term> {
            self.0.get_term(id)
        }

        fn get_author(&self, id: AuthorId) -> Option<Author> {
            self.0.get_author(id)
        }

        fn taxonomy_exists(&self, taxonomy: &str) -> bool {
            self.0.taxonomy_exists(taxonomy)
        }

        fn all_entities(&self) -> Vec<Entity> {
            self.0.all_entities()
        }
    }

    /// Posts 1, 2, 3 published at 10, 20, 30. Post 1 and 3 in category 5,
    /// post 2 in category 6.
    fn posts() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_term(Term::new(5, CATEGORY, "news"));
        store.insert_term(Term::new(6, CATEGORY, "misc"));
        store.insert_entity(Entity::new(1, "post", "first", 10));
        store.insert_entity(Entity::new(2, "post", "second", 20));
        store.insert_entity(Entity::new(3, "post", "third", 30));
        store.assign_terms(1, [5]);
        store.assign_terms(2, [6]);
        store.assign_terms(3, [5]);
        store
    }

    fn setup() -> (Arc<CountingStore>, AdjacentQuery) {
        let store = Arc::new(CountingStore::new(posts()));
        let query = AdjacentQuery::new(store.clone(), Arc::new(MemoryCache::new()));
        (store, query)
    }

    fn entity(store: &dyn EntityStore, id: EntityId) -> Entity {
        store.get_entity(id).unwrap()
    }

    fn ids(found: Option<Entity>) -> Option<EntityId> {
        found.map(|e| e.id)
    }

    fn same_term() -> AdjacencyConstraints {
        AdjacencyConstraints {
            same_term: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_next_and_previous() {
        let (store, query) = setup();
        let any = AdjacencyConstraints::default();
        let viewer = Viewer::ANONYMOUS;

        let second = entity(&*store, 2);
        let third = entity(&*store, 3);
        let first = entity(&*store, 1);

        assert_eq!(ids(query.find_adjacent(&second, Direction::Next, &any, viewer).unwrap()), Some(3));
        assert_eq!(ids(query.find_adjacent(&third, Direction::Next, &any, viewer).unwrap()), None);
        assert_eq!(ids(query.find_adjacent(&second, Direction::Previous, &any, viewer).unwrap()), Some(1));
        assert_eq!(ids(query.find_adjacent(&first, Direction::Previous, &any, viewer).unwrap()), None);
    }

    #[test]
    fn test_identical_inputs_query_once() {
        let (store, query) = setup();
        let any = AdjacencyConstraints::default();
        let second = entity(&*store, 2);

        for _ in 0..3 {
            let found = query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
            assert_eq!(ids(found), Some(3));
        }
        assert_eq!(store.queries(), 1);
    }

    #[test]
    fn test_empty_result_is_cached() {
        let (store, query) = setup();
        let any = AdjacencyConstraints::default();
        let third = entity(&*store, 3);

        assert!(query.find_adjacent(&third, Direction::Next, &any, Viewer::ANONYMOUS).unwrap().is_none());
        assert!(query.find_adjacent(&third, Direction::Next, &any, Viewer::ANONYMOUS).unwrap().is_none());
        assert_eq!(store.queries(), 1);
    }

    #[test]
    fn test_viewer_is_part_of_key() {
        let (store, query) = setup();
        let any = AdjacencyConstraints::default();
        let second = entity(&*store, 2);

        query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        query.find_adjacent(&second, Direction::Next, &any, Viewer::user(1)).unwrap();
        assert_eq!(store.queries(), 2);
    }

    #[test]
    fn test_same_term() {
        let (store, query) = setup();
        let first = entity(&*store, 1);
        let found = query.find_adjacent(&first, Direction::Next, &same_term(), Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(found), Some(3));
    }

    #[test]
    fn test_same_term_without_terms() {
        let inner = posts();
        inner.insert_entity(Entity::new(4, "post", "loose", 40));
        let store = Arc::new(CountingStore::new(inner));
        let query = AdjacentQuery::new(store.clone(), Arc::new(MemoryCache::new()));

        let loose = entity(&*store, 4);
        let found = query.find_adjacent(&loose, Direction::Previous, &same_term(), Viewer::ANONYMOUS).unwrap();
        assert!(found.is_none());
        assert_eq!(store.queries(), 0);
    }

    #[test]
    fn test_same_term_all_excluded() {
        let (store, query) = setup();
        let constraints = AdjacencyConstraints {
            same_term: true,
            excluded_terms: BTreeSet::from([5]),
            ..Default::default()
        };
        let first = entity(&*store, 1);
        let found = query.find_adjacent(&first, Direction::Next, &constraints, Viewer::ANONYMOUS).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_excluded_terms_skip_candidates() {
        let (store, query) = setup();
        let constraints = AdjacencyConstraints {
            excluded_terms: BTreeSet::from([6]),
            ..Default::default()
        };
        let first = entity(&*store, 1);
        let found = query.find_adjacent(&first, Direction::Next, &constraints, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(found), Some(3));
    }

    #[test]
    fn test_unknown_taxonomy() {
        let (store, query) = setup();
        let constraints = AdjacencyConstraints {
            same_term: true,
            taxonomy: "genre".into(),
            ..Default::default()
        };
        let first = entity(&*store, 1);
        let found = query.find_adjacent(&first, Direction::Next, &constraints, Viewer::ANONYMOUS).unwrap();
        assert!(found.is_none());
        assert_eq!(store.queries(), 0);
    }

    #[test]
    fn test_unknown_taxonomy_ignored_when_unconstrained() {
        let (store, query) = setup();
        let constraints = AdjacencyConstraints {
            taxonomy: "genre".into(),
            ..Default::default()
        };
        let first = entity(&*store, 1);
        let found = query.find_adjacent(&first, Direction::Next, &constraints, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(found), Some(2));
    }

    #[test]
    fn test_private_visibility() {
        let inner = posts();
        inner.insert_entity(
            Entity::new(4, "post", "secret", 25)
                .with_status(Status::Private)
                .with_author(9),
        );
        let store: Arc<dyn EntityStore> = Arc::new(inner);
        let query = AdjacentQuery::new(store.clone(), Arc::new(MemoryCache::new()));
        let any = AdjacencyConstraints::default();
        let second = entity(&*store, 2);

        let anon = query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(anon), Some(3));

        let owner = query.find_adjacent(&second, Direction::Next, &any, Viewer::user(9)).unwrap();
        assert_eq!(ids(owner), Some(4));

        let editor = Viewer::user(1).with_read_private(true);
        let found = query.find_adjacent(&second, Direction::Next, &any, editor).unwrap();
        assert_eq!(ids(found), Some(4));
    }

    #[test]
    fn test_other_kinds_and_drafts_skipped() {
        let inner = posts();
        inner.insert_entity(Entity::new(4, "page", "about", 25));
        inner.insert_entity(Entity::new(5, "post", "wip", 26).with_status(Status::Draft));
        let store: Arc<dyn EntityStore> = Arc::new(inner);
        let query = AdjacentQuery::new(store.clone(), Arc::new(MemoryCache::new()));

        let second = entity(&*store, 2);
        let found = query
            .find_adjacent(&second, Direction::Next, &AdjacencyConstraints::default(), Viewer::ANONYMOUS)
            .unwrap();
        assert_eq!(ids(found), Some(3));
    }

    #[test]
    fn test_ties_keep_natural_order() {
        let inner = posts();
        inner.insert_entity(Entity::new(4, "post", "twin-a", 40));
        inner.insert_entity(Entity::new(5, "post", "twin-b", 40));
        let store: Arc<dyn EntityStore> = Arc::new(inner);
        let query = AdjacentQuery::new(store.clone(), Arc::new(MemoryCache::new()));
        let any = AdjacencyConstraints::default();

        let third = entity(&*store, 3);
        let found = query.find_adjacent(&third, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(found), Some(4));
    }

    #[test]
    fn test_unreadable_cache_value_is_miss() {
        let store = Arc::new(CountingStore::new(posts()));
        let cache = Arc::new(MemoryCache::new());
        let query = AdjacentQuery::new(store.clone(), cache.clone());
        let any = AdjacencyConstraints::default();
        let second = entity(&*store, 2);

        query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        let key = AdjacencyQueryKey {
            direction: Direction::Next,
            same_term: false,
            terms: &[],
            excluded: &BTreeSet::new(),
            published: 20,
            kind: &second.kind,
            taxonomy: CATEGORY,
            viewer: Viewer::ANONYMOUS,
        }
        .cache_key();
        assert_eq!(cache.get(&key, BUCKET).as_deref(), Some("3"));

        cache.set(&key, "garbage", BUCKET);
        let found = query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(found), Some(3));
        assert_eq!(store.queries(), 2);
        assert_eq!(cache.get(&key, BUCKET).as_deref(), Some("3"));
    }

    #[test]
    fn test_cached_entity_no_longer_visible_is_miss() {
        let store = Arc::new(CountingStore::new(posts()));
        let query = AdjacentQuery::new(store.clone(), Arc::new(MemoryCache::new()));
        let any = AdjacencyConstraints::default();
        let second = entity(&*store, 2);

        let found = query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(found), Some(3));

        store
            .inner
            .insert_entity(Entity::new(3, "post", "third", 30).with_status(Status::Private));
        let found = query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(found), None);
        assert_eq!(store.queries(), 2);

        // The refreshed "none" answer is served from cache.
        query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        assert_eq!(store.queries(), 2);
    }

    #[test]
    fn test_flush_bucket_forces_requery() {
        let store = Arc::new(CountingStore::new(posts()));
        let cache = Arc::new(MemoryCache::new());
        let query = AdjacentQuery::new(store.clone(), cache.clone());
        let any = AdjacencyConstraints::default();
        let second = entity(&*store, 2);

        query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        cache.flush_bucket(BUCKET);
        query.find_adjacent(&second, Direction::Next, &any, Viewer::ANONYMOUS).unwrap();
        assert_eq!(store.queries(), 2);
    }

    #[test]
    fn test_store_error_propagates_uncached() {
        let cache = Arc::new(MemoryCache::new());
        let query = AdjacentQuery::new(Arc::new(BrokenStore(posts())), cache.clone());
        let second = Entity::new(2, "post", "second", 20);

        let err = query
            .find_adjacent(&second, Direction::Next, &AdjacencyConstraints::default(), Viewer::ANONYMOUS)
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_boundary() {
        let (store, query) = setup();
        let second = entity(&*store, 2);
        let any = AdjacencyConstraints::default();

        let first = query.find_boundary(&second, Boundary::First, &any, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(first), Some(1));
        let last = query.find_boundary(&second, Boundary::Last, &any, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(last), Some(3));

        let only_misc = AdjacencyConstraints {
            excluded_terms: BTreeSet::from([5]),
            ..Default::default()
        };
        let last = query.find_boundary(&second, Boundary::Last, &only_misc, Viewer::ANONYMOUS).unwrap();
        assert_eq!(ids(last), Some(2));
    }

    #[test]
    fn test_adjacent_link_applies_hook() {
        let config = test_parse_config(
            "[site]\nurl = \"https://example.com\"\n[permalink]\nstructure = \"/%postname%/\"",
        );
        let store: Arc<dyn EntityStore> = Arc::new(posts());
        let hooks = Arc::new(HookRegistry::new());
        hooks.register_filter(names::NEXT_POST_LINK, |url, args| {
            assert_eq!(args.kind, "next");
            format!("{url}#next")
        });
        let links = LinkAssembler::new(&config, store.clone(), hooks);
        let query = AdjacentQuery::new(store.clone(), Arc::new(MemoryCache::new()));
        let any = AdjacencyConstraints::default();

        let second = entity(&*store, 2);
        let next = query
            .adjacent_link(&links, &second, Direction::Next, &any, Viewer::ANONYMOUS)
            .unwrap();
        assert_eq!(next.as_deref(), Some("https://example.com/third/#next"));

        let previous = query
            .adjacent_link(&links, &second, Direction::Previous, &any, Viewer::ANONYMOUS)
            .unwrap();
        assert_eq!(previous.as_deref(), Some("https://example.com/first/"));

        let third = entity(&*store, 3);
        let none = query
            .adjacent_link(&links, &third, Direction::Next, &any, Viewer::ANONYMOUS)
            .unwrap();
        assert!(none.is_none());
    }
}
