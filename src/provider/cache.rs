//! In-memory TTL cache for provider responses.
//!
//! Keyed by (endpoint, resource id). Entries expire lazily on read after a
//! fixed window (5 minutes by default); `put` always overwrites with a
//! fresh timestamp. There is no size bound: same-day race data keeps the
//! key space small, and entries for past ids simply go stale.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use super::Endpoint;

/// Default entry lifetime.
pub const DEFAULT_TTL_SECS: i64 = 300;

/// Composite cache key: endpoint kind plus resource id (date, meetingId,
/// raceId, or `*`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub endpoint: Endpoint,
    pub id: String,
}

impl CacheKey {
    pub fn new(endpoint: Endpoint, id: impl Into<String>) -> Self {
        Self {
            endpoint,
            id: id.into(),
        }
    }
}

struct CacheEntry {
    data: Value,
    cached_at: DateTime<Utc>,
}

/// TTL cache behind an async lock so concurrent handlers get atomic
/// get/put. Concurrent misses on the same key may both fetch remotely;
/// reads are idempotent so the duplicate work is accepted.
pub struct TtlCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl TtlCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached payload if the entry is still fresh.
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if Utc::now() - entry.cached_at >= self.ttl {
            return None;
        }
        Some(entry.data.clone())
    }

    /// Store a payload, unconditionally overwriting and re-stamping.
    pub async fn put(&self, key: CacheKey, data: Value) {
        self.put_at(key, data, Utc::now()).await;
    }

    async fn put_at(&self, key: CacheKey, data: Value, cached_at: DateTime<Utc>) {
        let mut entries = self.entries.write().await;
        entries.insert(key, CacheEntry { data, cached_at });
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn fresh_entry_is_returned() {
        let cache = TtlCache::default();
        let key = CacheKey::new(Endpoint::Meetings, "26-Mar-2025");
        cache.put(key.clone(), json!(["payload"])).await;
        assert_eq!(cache.get(&key).await, Some(json!(["payload"])));
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss() {
        let cache = TtlCache::default();
        let key = CacheKey::new(Endpoint::Races, "176739");
        let stale = Utc::now() - Duration::seconds(DEFAULT_TTL_SECS + 1);
        cache.put_at(key.clone(), json!(["old"]), stale).await;
        assert_eq!(cache.get(&key).await, None);
    }

    #[tokio::test]
    async fn entry_just_inside_window_survives() {
        let cache = TtlCache::default();
        let key = CacheKey::new(Endpoint::Races, "176739");
        let nearly = Utc::now() - Duration::seconds(DEFAULT_TTL_SECS - 5);
        cache.put_at(key.clone(), json!(["recent"]), nearly).await;
        assert_eq!(cache.get(&key).await, Some(json!(["recent"])));
    }

    #[tokio::test]
    async fn put_overwrites_and_restamps() {
        let cache = TtlCache::default();
        let key = CacheKey::new(Endpoint::Fields, "912345");
        let stale = Utc::now() - Duration::seconds(DEFAULT_TTL_SECS * 2);
        cache.put_at(key.clone(), json!(["old"]), stale).await;
        cache.put(key.clone(), json!(["new"])).await;
        assert_eq!(cache.get(&key).await, Some(json!(["new"])));
    }

    #[tokio::test]
    async fn composite_keys_are_isolated() {
        let cache = TtlCache::default();
        let a = CacheKey::new(Endpoint::Races, "176739");
        let b = CacheKey::new(Endpoint::Races, "176742");
        cache.put(a.clone(), json!(["a"])).await;
        cache.put(b.clone(), json!(["b"])).await;

        // Expire one; the other must be untouched.
        let stale = Utc::now() - Duration::seconds(DEFAULT_TTL_SECS + 1);
        cache.put_at(a.clone(), json!(["a"]), stale).await;
        assert_eq!(cache.get(&a).await, None);
        assert_eq!(cache.get(&b).await, Some(json!(["b"])));
    }

    #[tokio::test]
    async fn same_id_different_endpoint_is_a_different_key() {
        let cache = TtlCache::default();
        cache
            .put(CacheKey::new(Endpoint::Fields, "912345"), json!(["fields"]))
            .await;
        assert_eq!(
            cache.get(&CacheKey::new(Endpoint::Comments, "912345")).await,
            None
        );
    }
}
