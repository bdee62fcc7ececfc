//! Response cache keyed by request

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Request a cached body answers: path plus exact query parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(path: impl Into<String>, query: &[(String, String)]) -> Self {
        Self {
            path: path.into(),
            query: query.to_vec(),
        }
    }
}

/// Bounded LRU of raw response bodies with a time-to-live
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<LruCache<CacheKey, (Instant, String)>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fresh body for a key; a stale entry is dropped
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut entries = self.entries.lock().ok()?;
        let (stored, body) = entries.get(key)?;
        if stored.elapsed() < self.ttl {
            return Some(body.clone());
        }
        entries.pop(key);
        None
    }

    /// Store a body, evicting expired entries and then the least recently used
    pub fn insert(&self, key: CacheKey, body: String) {
        if self.ttl.is_zero() {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        let expired: Vec<CacheKey> = entries
            .iter()
            .filter(|(_, (stored, _))| stored.elapsed() >= self.ttl)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }

        entries.put(key, (Instant::now(), body));
    }

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

#[cfg(test)]
mod tests {
    use super::*;

    fn key(path: &str) -> CacheKey {
        CacheKey::new(path, &[])
    }

    #[test]
    fn test_fresh_entry() {
        let cache = ResponseCache::new(Duration::from_secs(60), 8);
        cache.insert(key("/games"), "{}".to_string());
        assert_eq!(cache.get(&key("/games")).as_deref(), Some("{}"));
        assert_eq!(cache.get(&key("/other")), None);
    }

    #[test]
    fn test_stale_entry_dropped() {
        let cache = ResponseCache::new(Duration::from_millis(1), 8);
        cache.insert(key("/games"), "{}".to_string());
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.get(&key("/games")), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries_evicted_on_insert() {
        let cache = ResponseCache::new(Duration::from_millis(1), 200);
        for i in 0..100 {
            cache.insert(key(&format!("/games/{}", i)), "{}".to_string());
        }
        std::thread::sleep(Duration::from_millis(5));

        cache.insert(key("/games/fresh"), "{}".to_string());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_bounded() {
        let cache = ResponseCache::new(Duration::from_secs(60), 2);
        cache.insert(key("/a"), "a".to_string());
        cache.insert(key("/b"), "b".to_string());
        cache.get(&key("/a"));
        cache.insert(key("/c"), "c".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("/b")), None);
        assert_eq!(cache.get(&key("/a")).as_deref(), Some("a"));
    }

    #[test]
    fn test_query_values_not_confused() {
        let cache = ResponseCache::new(Duration::from_secs(60), 8);
        let injected = CacheKey::new(
            "/games",
            &[("search".to_string(), "zelda&genres=4".to_string())],
        );
        let filtered = CacheKey::new(
            "/games",
            &[
                ("search".to_string(), "zelda".to_string()),
                ("genres".to_string(), "4".to_string()),
            ],
        );

        cache.insert(injected.clone(), "injected".to_string());
        assert_eq!(cache.get(&filtered), None);
        assert_eq!(cache.get(&injected).as_deref(), Some("injected"));
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = ResponseCache::new(Duration::ZERO, 8);
        cache.insert(key("/games"), "{}".to_string());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let cache = ResponseCache::new(Duration::from_secs(60), 0);
        cache.insert(key("/a"), "a".to_string());
        cache.insert(key("/b"), "b".to_string());
        assert_eq!(cache.len(), 1);
    }
}
