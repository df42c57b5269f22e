//! Lookaside cache collaborator for adjacency results.

use dashmap::DashMap;

/// Bucketed string cache. Implementations must be safe to share.
pub trait ObjectCache: Send + Sync {
    fn get(&self, key: &str, bucket: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, bucket: &str);
}

/// In-process cache (thread-safe).
///
/// No eviction: entries live until their bucket is flushed.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<(String, String), String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry in `bucket`. Call after mutating entities.
    pub fn flush_bucket(&self, bucket: &str) {
        self.entries.retain(|(b, _), _| b != bucket);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ObjectCache for MemoryCache {
    fn get(&self, key: &str, bucket: &str) -> Option<String> {
        self.entries
            .get(&(bucket.to_string(), key.to_string()))
            .map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: &str, bucket: &str) {
        self.entries
            .insert((bucket.to_string(), key.to_string()), value.to_string());
    }
}
