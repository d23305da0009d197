//! Cache module for published reads
//!
//! Published query results are kept in memory for a revalidation window so
//! that the several fetches a single page issues (and concurrent requests for
//! the same page) hit the content store once. Draft reads never touch it.

use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::content::QueryRequest;

/// A cached query result
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub fetched_at: Instant,
}

/// Time-bounded cache of query results, keyed by request
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<u64, CacheEntry>>,
}

impl ResponseCache {
    /// Create a cache; a zero `ttl` disables it
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Fresh value for a key, if any
    pub fn get(&self, key: u64) -> Option<Value> {
        if !self.is_enabled() {
            return None;
        }
        let mut entries = self.entries.lock().ok()?;
        match entries.get(&key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store a value, sweeping out every expired entry first
    pub fn insert(&self, key: u64, value: Value) {
        if !self.is_enabled() {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
            entries.insert(
                key,
                CacheEntry {
                    value,
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    /// Drop every entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Calculate the cache key for a request and its stega setting
pub fn cache_key(request: &QueryRequest, stega: bool) -> u64 {
    let mut hasher = DefaultHasher::new();
    request.hash(&mut hasher);
    stega.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Perspective, Query};
    use serde_json::json;

    fn request(slug: &str) -> QueryRequest {
        QueryRequest {
            query: Query::Post {
                slug: slug.to_string(),
            },
            perspective: Perspective::Published,
            use_cdn: true,
        }
    }

    #[test]
    fn test_cache_key_distinguishes_requests() {
        assert_eq!(cache_key(&request("a"), false), cache_key(&request("a"), false));
        assert_ne!(cache_key(&request("a"), false), cache_key(&request("b"), false));
        assert_ne!(cache_key(&request("a"), false), cache_key(&request("a"), true));
    }

    #[test]
    fn test_get_and_insert() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let key = cache_key(&request("a"), false);
        assert!(cache.get(key).is_none());

        cache.insert(key, json!({"title": "A"}));
        assert_eq!(cache.get(key), Some(json!({"title": "A"})));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = ResponseCache::new(Duration::from_millis(1));
        let key = cache_key(&request("a"), false);
        cache.insert(key, json!(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_sweeps_expired_entries() {
        let cache = ResponseCache::new(Duration::from_millis(20));
        for i in 0..100 {
            cache.insert(cache_key(&request(&format!("missing-{}", i)), false), json!(null));
        }
        assert_eq!(cache.len(), 100);

        std::thread::sleep(Duration::from_millis(40));
        let fresh = cache_key(&request("fresh"), false);
        cache.insert(fresh, json!(1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(fresh), Some(json!(1)));
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = ResponseCache::new(Duration::ZERO);
        assert!(!cache.is_enabled());
        cache.insert(1, json!(1));
        assert!(cache.get(1).is_none());
        assert!(cache.is_empty());
    }
}
