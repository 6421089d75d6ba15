//! Per-sheet field-metadata cache.
//!
//! Field listings change rarely, so the service keeps the last listing per sheet for a short
//! time. Readers share a read lock; writers replace whole entries and the last writer wins.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::types::FieldMetadata;

/// How long a cached field listing is served before it is fetched again.
pub const DEFAULT_FIELD_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// A cached field listing and when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fields: Vec<FieldMetadata>,
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// An entry fetched now.
    pub fn new(fields: Vec<FieldMetadata>) -> Self {
        Self {
            fields,
            fetched_at: Instant::now(),
        }
    }

    /// Whether the entry is strictly younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Thread-safe map from sheet id to [`CacheEntry`].
#[derive(Debug)]
pub struct FieldCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Default for FieldCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_FIELD_CACHE_TTL)
    }
}

impl FieldCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the entry for `sheet_id` if it is still fresh.
    ///
    /// Stale entries are left in place; the next [`Self::put`] overwrites them.
    pub fn get(&self, sheet_id: &str) -> Option<CacheEntry> {
        let entries = self.entries.read();
        entries
            .get(sheet_id)
            .filter(|entry| entry.is_fresh(self.ttl))
            .cloned()
    }

    /// Store `entry`, replacing whatever was cached for `sheet_id`.
    pub fn put(&self, sheet_id: impl Into<String>, entry: CacheEntry) {
        self.entries.write().insert(sheet_id.into(), entry);
    }

    /// Number of entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn listing(key: &str) -> Vec<FieldMetadata> {
        vec![FieldMetadata::new(key, key)]
    }

    #[test]
    fn fresh_entries_are_served() {
        let cache = FieldCache::default();
        assert_eq!(cache.ttl(), DEFAULT_FIELD_CACHE_TTL);
        assert!(cache.get("s1").is_none());

        cache.put("s1", CacheEntry::new(listing("qty")));
        assert_eq!(cache.get("s1").unwrap().fields[0].key, "qty");
        assert!(cache.get("s2").is_none());
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = FieldCache::with_ttl(Duration::ZERO);
        cache.put("s1", CacheEntry::new(listing("qty")));
        assert!(cache.get("s1").is_none());
        assert_eq!(cache.len(), 1);

        let cache = FieldCache::with_ttl(Duration::from_millis(10));
        cache.put("s1", CacheEntry::new(listing("qty")));
        thread::sleep(Duration::from_millis(30));
        assert!(cache.get("s1").is_none());
    }

    #[test]
    fn last_writer_wins() {
        let cache = FieldCache::default();
        cache.put("s1", CacheEntry::new(listing("a")));
        cache.put("s1", CacheEntry::new(listing("b")));
        assert_eq!(cache.get("s1").unwrap().fields[0].key, "b");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_access() {
        let cache = Arc::new(FieldCache::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let id = format!("s{}", i % 2);
                    cache.put(id.clone(), CacheEntry::new(listing(&format!("k{i}"))));
                    cache.get(&id).is_some()
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
        assert_eq!(cache.len(), 2);
    }
}
