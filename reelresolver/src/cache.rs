//! In-memory cache of search results and message handles.
//!
//! Two maps live here:
//!
//! - query → candidate list, with a TTL and a capacity bound. Expiry is
//!   lazy: a stale entry is treated as a miss and left in place until a
//!   fresh `store` overwrites it or eviction removes it.
//! - item id → [`MessageKey`], so a later `resolve` can find the backend
//!   message behind a search result without re-running the search.
//!
//! Callers already serialize mutations behind the resolver's negotiation
//! lock; the cache still keeps its own interior mutability.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use reeltarget::MessageKey;

use crate::models::CandidateResult;

/// Cache entry for one query
#[derive(Debug, Clone)]
struct CacheEntry {
    candidates: Vec<CandidateResult>,
    stored_at: SystemTime,
}

impl CacheEntry {
    fn is_valid(&self, ttl: Duration) -> bool {
        match self.stored_at.elapsed() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }
}

/// Search result cache with TTL and oldest-entry eviction
pub struct ResultCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    handles: RwLock<HashMap<String, MessageKey>>,
    ttl: Duration,
    capacity: usize,
}

impl ResultCache {
    /// Create a cache with explicit bounds
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            handles: RwLock::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// Normalized cache key: trimmed, lowercased, inner whitespace collapsed
    fn normalize(query: &str) -> String {
        query
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Look up a query. Stale entries are a miss.
    pub fn lookup(&self, query: &str) -> Option<Vec<CandidateResult>> {
        let key = Self::normalize(query);
        let entries = self.entries.read().unwrap();
        entries
            .get(&key)
            .filter(|e| e.is_valid(self.ttl))
            .map(|e| e.candidates.clone())
    }

    /// Store a candidate list for a query.
    ///
    /// When the insert pushes the map over capacity, the entry with the
    /// oldest `stored_at` is evicted. Exactly one entry per insert.
    pub fn store(&self, query: &str, candidates: Vec<CandidateResult>) {
        let key = Self::normalize(query);
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            key,
            CacheEntry {
                candidates,
                stored_at: SystemTime::now(),
            },
        );

        if entries.len() > self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone());
            if let Some(k) = oldest {
                entries.remove(&k);
            }
        }
    }

    /// Message key behind an item id, if one was recorded
    pub fn lookup_handle(&self, item_id: &str) -> Option<MessageKey> {
        self.handles.read().unwrap().get(item_id).copied()
    }

    /// Record the message key behind an item id
    pub fn store_handle(&self, item_id: &str, key: MessageKey) {
        self.handles.write().unwrap().insert(item_id.to_string(), key);
    }

    /// Drop everything. Idempotent.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
        self.handles.write().unwrap().clear();
    }

    /// Number of query entries physically present (valid or stale)
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateResult, OptionKind, StreamOption};

    fn candidate(id: &str) -> CandidateResult {
        CandidateResult {
            id: id.to_string(),
            title: "Test".to_string(),
            snippet: String::new(),
            year: None,
            imdb_rating: None,
            genres: vec![],
            options: vec![StreamOption {
                label: "Play".to_string(),
                kind: OptionKind::DirectLocator,
                value: "http://example.com".to_string(),
            }],
        }
    }

    #[test]
    fn test_lookup_normalizes_query() {
        let cache = ResultCache::new(Duration::from_secs(300), 10);
        cache.store("  The   MATRIX ", vec![candidate("msg_1_1")]);

        assert!(cache.lookup("the matrix").is_some());
        assert!(cache.lookup("THE MATRIX").is_some());
        assert!(cache.lookup("matrix").is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss_but_stays() {
        let cache = ResultCache::new(Duration::ZERO, 10);
        cache.store("query", vec![candidate("msg_1_1")]);

        assert!(cache.lookup("query").is_none());
        // Not physically removed
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_over_capacity_evicts_single_oldest() {
        let cache = ResultCache::new(Duration::from_secs(300), 3);
        cache.store("first", vec![candidate("msg_1_1")]);
        std::thread::sleep(Duration::from_millis(5));
        cache.store("second", vec![candidate("msg_1_2")]);
        std::thread::sleep(Duration::from_millis(5));
        cache.store("third", vec![candidate("msg_1_3")]);
        std::thread::sleep(Duration::from_millis(5));
        cache.store("fourth", vec![candidate("msg_1_4")]);

        assert_eq!(cache.len(), 3);
        assert!(cache.lookup("first").is_none());
        assert!(cache.lookup("second").is_some());
        assert!(cache.lookup("third").is_some());
        assert!(cache.lookup("fourth").is_some());
    }

    #[test]
    fn test_handles_survive_clear_only_until_clear() {
        let cache = ResultCache::new(Duration::from_secs(300), 10);
        let key = MessageKey::new(7, 13);
        cache.store_handle("msg_7_13", key);
        assert_eq!(cache.lookup_handle("msg_7_13"), Some(key));

        cache.clear();
        assert_eq!(cache.lookup_handle("msg_7_13"), None);
        // clear is idempotent
        cache.clear();
        assert!(cache.is_empty());
    }
}
