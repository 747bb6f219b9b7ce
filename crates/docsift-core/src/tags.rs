//! Process-wide tag cache.
//!
//! Records every tag name the service has seen so request paths can tell
//! new tags from already-known ones without another upstream round trip.
//! Entries are inserted once per distinct name and never evicted; lookups
//! bump per-entry hit counters and the cache-wide hit/miss tally.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata kept per cached tag name.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Number of lookups that found this entry already present.
    pub hit_count: u64,
    /// When the entry was last returned by a lookup.
    pub last_access: DateTime<Utc>,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Concurrent map from tag name to cache metadata.
///
/// Reads (stats, size) take a shared lock; `lookup_and_record` takes the
/// exclusive lock once and combines the existence check with insertion, so
/// a batch of names costs a single lock acquisition.
#[derive(Default)]
pub struct TagCache {
    inner: RwLock<CacheInner>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a batch of candidate names, returning the subset that was
    /// not yet cached (in input order, duplicates collapsed).
    ///
    /// Names already present count as hits and get their entry refreshed;
    /// absent names count as misses and are inserted.
    pub fn lookup_and_record(&self, candidate_names: &[String]) -> Vec<String> {
        let mut inner = self.inner.write().expect("tag cache lock poisoned");
        let now = Utc::now();
        let mut new_names = Vec::new();

        for name in candidate_names {
            match inner.entries.get_mut(name) {
                Some(entry) => {
                    entry.hit_count += 1;
                    entry.last_access = now;
                    inner.hits += 1;
                }
                None => {
                    inner.entries.insert(
                        name.clone(),
                        CacheEntry {
                            hit_count: 0,
                            last_access: now,
                        },
                    );
                    inner.misses += 1;
                    new_names.push(name.clone());
                }
            }
        }

        new_names
    }

    /// Fraction of lookups that were hits; 0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let inner = self.inner.read().expect("tag cache lock poisoned");
        let total = inner.hits + inner.misses;
        if total > 0 {
            inner.hits as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Number of distinct cached tag names.
    pub fn len(&self) -> usize {
        self.inner.read().expect("tag cache lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cached tag names, in no particular order.
    pub fn known_tags(&self) -> Vec<String> {
        self.inner
            .read()
            .expect("tag cache lock poisoned")
            .entries
            .keys()
            .cloned()
            .collect()
    }

    /// Counter snapshot for logging and health endpoints.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read().expect("tag cache lock poisoned");
        let total = inner.hits + inner.misses;
        CacheStats {
            size: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
            hit_rate: if total > 0 {
                inner.hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}
