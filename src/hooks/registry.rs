//! Named, ordered filter chains.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::content::{AuthorId, EntityId, TermId};

/// Priority used by [`HookRegistry::register_filter`].
pub const DEFAULT_PRIORITY: i32 = 10;

/// A value transformer: receives the current value, returns the next one.
pub type Filter = Arc<dyn Fn(String, &FilterArgs) -> String + Send + Sync>;

/// Context handed to every filter alongside the value.
///
/// Only the fields relevant to the link being built are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// Link kind (`"post"`, `"year"`, `"term"`, ...).
    pub kind: &'static str,
    pub entity: Option<EntityId>,
    pub term: Option<TermId>,
    pub author: Option<AuthorId>,
    pub feed: Option<String>,
    pub page: Option<u32>,
    pub query: Option<String>,
    pub sample: bool,
    pub leave_name: bool,
}

impl FilterArgs {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn entity(mut self, id: EntityId) -> Self {
        self.entity = Some(id);
        self
    }

    pub fn term(mut self, id: TermId) -> Self {
        self.term = Some(id);
        self
    }

    pub fn author(mut self, id: AuthorId) -> Self {
        self.author = Some(id);
        self
    }

    pub fn feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = Some(feed.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn flags(mut self, sample: bool, leave_name: bool) -> Self {
        self.sample = sample;
        self.leave_name = leave_name;
        self
    }
}

struct Registered {
    priority: i32,
    filter: Filter,
}

/// Registry of filter chains keyed by hook name.
///
/// Within one hook, filters run by ascending priority; equal priorities run
/// in registration order. Applying a hook nobody registered returns the
/// input unchanged.
#[derive(Default)]
pub struct HookRegistry {
    filters: RwLock<FxHashMap<String, Vec<Registered>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter at the default priority.
    pub fn register_filter<F>(&self, name: &str, filter: F)
    where
        F: Fn(String, &FilterArgs) -> String + Send + Sync + 'static,
    {
        self.register_filter_with_priority(name, DEFAULT_PRIORITY, filter);
    }

    /// Insert a filter after every filter of lower or equal priority.
    pub fn register_filter_with_priority<F>(&self, name: &str, priority: i32, filter: F)
    where
        F: Fn(String, &FilterArgs) -> String + Send + Sync + 'static,
    {
        let mut filters = self.filters.write();
        let chain = filters.entry(name.to_string()).or_default();
        let pos = chain.partition_point(|r| r.priority <= priority);
        chain.insert(
            pos,
            Registered {
                priority,
                filter: Arc::new(filter),
            },
        );
    }

    /// Run `value` through the chain registered under `name`.
    pub fn apply_filter(&self, name: &str, value: String, args: &FilterArgs) -> String {
        // Snapshot the chain so filters may register filters without deadlocking.
        let chain: Vec<Filter> = match self.filters.read().get(name) {
            Some(chain) => chain.iter().map(|r| Arc::clone(&r.filter)).collect(),
            None => return value,
        };

        chain.iter().fold(value, |acc, filter| filter(acc, args))
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters
            .read()
            .get(name)
            .is_some_and(|chain| !chain.is_empty())
    }

    /// Drop every filter registered under `name`.
    pub fn remove_all(&self, name: &str) {
        self.filters.write().remove(name);
    }

    pub fn len(&self, name: &str) -> usize {
        self.filters.read().get(name).map_or(0, Vec::len)
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filters = self.filters.read();
        let mut map = f.debug_map();
        for (name, chain) in filters.iter() {
            map.entry(name, &chain.len());
        }
        map.finish()
    }
}
