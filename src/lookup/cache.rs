//! In-memory resolution cache.
//!
//! Remembers the outcome of every resolution (a URL, or confirmed absence)
//! for the life of the process so repeated lookups skip the network.

use chrono::{DateTime, Utc};
use coverhound_common::QueryKey;
use dashmap::DashMap;
use std::time::Instant;

/// A cached resolution outcome.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Resolved URL; `None` means no provider could resolve the query.
    pub url: Option<String>,
    /// When the outcome was recorded.
    pub resolved_at: DateTime<Utc>,
    last_accessed: Instant,
}

impl CacheEntry {
    fn new(url: Option<String>) -> Self {
        Self {
            url,
            resolved_at: Utc::now(),
            last_accessed: Instant::now(),
        }
    }

    /// Whether this entry records a confirmed absence.
    pub fn is_negative(&self) -> bool {
        self.url.is_none()
    }
}

/// Thread-safe cache of resolution outcomes.
///
/// Unbounded by default. With a capacity, inserting into a full cache
/// evicts the least recently accessed entry first.
pub struct ResultCache {
    entries: DashMap<QueryKey, CacheEntry>,
    max_entries: Option<usize>,
}

impl ResultCache {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: None,
        }
    }

    /// Create a cache holding at most `max_entries` outcomes.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: Some(max_entries.max(1)),
        }
    }

    /// Look up an outcome, refreshing its access time.
    pub fn get(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.entries.get_mut(key).map(|mut entry| {
            entry.last_accessed = Instant::now();
            entry.clone()
        })
    }

    /// Record an outcome for `key`, replacing any previous one.
    pub fn put(&self, key: QueryKey, url: Option<String>) {
        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                self.evict_oldest();
            }
        }

        self.entries.insert(key, CacheEntry::new(url));
    }

    /// Remove an entry from the cache.
    pub fn remove(&self, key: &QueryKey) {
        self.entries.remove(key);
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity, if bounded.
    pub fn capacity(&self) -> Option<usize> {
        self.max_entries
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.last_accessed)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
