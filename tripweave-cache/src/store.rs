//! Cache store trait and the in-memory backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Key/value store with per-entry TTL.
///
/// The contract every backend must honor:
///
/// - `get` never fails the caller: a backend error is logged and read as
///   a miss;
/// - `set` is fire-and-forget: a failed write does not invalidate the
///   already-computed value being returned to the caller;
/// - concurrent get/set from overlapping aggregations must not corrupt
///   entries; last-writer-wins on key collision is acceptable.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a key. Expired entries and backend errors read as `None`.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value under `key` for `ttl`. Failures are logged, never
    /// surfaced.
    async fn set(&self, key: &str, value: String, ttl: Duration);
}

/// Counters for cache observability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// In-process cache backend over a concurrent hash map.
///
/// Entries are evicted lazily on read; [`MemoryCacheStore::purge_expired`]
/// is available for callers that want active eviction.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hit/miss counters and entry count.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Utc::now();
        // The read guard must be dropped before any same-shard write, so
        // eviction happens in a second step rather than inside the lookup.
        let value = self
            .entries
            .get(key)
            .and_then(|entry| (!entry.is_expired(now)).then(|| entry.value.clone()));
        if value.is_none() {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        match &value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        value
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let ttl = match chrono::Duration::from_std(ttl) {
            Ok(ttl) => ttl,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache ttl out of range, skipping write");
                return;
            }
        };
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Utc::now() + ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryCacheStore::new();
        store
            .set("venues:abc", "[1,2,3]".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(store.get("venues:abc").await.as_deref(), Some("[1,2,3]"));
    }

    #[tokio::test]
    async fn zero_ttl_entries_expire() {
        let store = MemoryCacheStore::new();
        store
            .set("weather:k", "{}".to_string(), Duration::from_secs(0))
            .await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(store.get("weather:k").await, None);
    }

    #[tokio::test]
    async fn reading_an_expired_entry_evicts_it() {
        let store = MemoryCacheStore::new();
        store
            .set("taste:k", "{}".to_string(), Duration::from_secs(0))
            .await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(store.get("taste:k").await, None);
        assert_eq!(store.stats().entries, 0);

        // The key stays usable after eviction.
        store
            .set("taste:k", "fresh".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(store.get("taste:k").await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn last_writer_wins_on_collision() {
        let store = MemoryCacheStore::new();
        store
            .set("k", "first".to_string(), Duration::from_secs(60))
            .await;
        store
            .set("k", "second".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(store.get("k").await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn stats_count_hits_and_misses() {
        let store = MemoryCacheStore::new();
        store.get("missing").await;
        store
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await;
        store.get("k").await;

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn purge_removes_only_expired_entries() {
        let store = MemoryCacheStore::new();
        store
            .set("stale", "v".to_string(), Duration::from_secs(0))
            .await;
        store
            .set("fresh", "v".to_string(), Duration::from_secs(60))
            .await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(store.purge_expired(), 1);
        assert!(store.get("fresh").await.is_some());
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_corrupt_entries() {
        let store = Arc::new(MemoryCacheStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .set("shared", format!("writer-{}", i), Duration::from_secs(60))
                    .await;
                store.get("shared").await
            }));
        }
        for handle in handles {
            let observed = handle.await.unwrap();
            // Any fully written value is acceptable; torn values are not.
            let observed = observed.unwrap();
            assert!(observed.starts_with("writer-"));
        }
    }
}
