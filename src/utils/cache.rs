//! Caching utilities for vsrc

use crate::cipher::key::{derive_master_key, MasterKey};
use moka::future::Cache;
use std::time::Duration;

/// Async cache with TTL, used for slow-changing remote values
pub type AsyncCache<K, V> = Cache<K, V>;

/// Create a new async cache with TTL
pub fn new_async_cache<K, V>(ttl: Duration) -> AsyncCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Cache::builder().time_to_live(ttl).build()
}

/// Master keys by `(client_key, server_key)`.
///
/// Derivation is a pure function of the pair, so entries never go stale;
/// the capacity bound keeps a long session from growing without limit.
#[derive(Clone)]
pub struct MasterKeyCache {
    cache: moka::sync::Cache<(String, String), MasterKey>,
}

impl MasterKeyCache {
    /// Create a cache holding at most `max_capacity` keys
    pub fn new(max_capacity: u64) -> Self {
        Self {
            cache: moka::sync::Cache::new(max_capacity),
        }
    }

    /// Cached master key for the pair, deriving it on first use
    pub fn get_or_derive(&self, client_key: &str, server_key: &str) -> MasterKey {
        self.cache
            .get_with((client_key.to_string(), server_key.to_string()), || {
                derive_master_key(client_key, server_key)
            })
    }

    /// Check whether the pair has a cached key
    pub fn contains(&self, client_key: &str, server_key: &str) -> bool {
        self.cache
            .contains_key(&(client_key.to_string(), server_key.to_string()))
    }

    /// Drop every cached key
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for MasterKeyCache {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_key_cache() {
        let cache = MasterKeyCache::default();
        assert!(!cache.contains("abc123", "serverKeyTest"));

        let key = cache.get_or_derive("abc123", "serverKeyTest");
        assert_eq!(key, derive_master_key("abc123", "serverKeyTest"));
        assert!(cache.contains("abc123", "serverKeyTest"));
        assert_eq!(cache.get_or_derive("abc123", "serverKeyTest"), key);

        // Pairs are ordered
        assert_ne!(cache.get_or_derive("serverKeyTest", "abc123"), key);

        cache.clear();
        assert!(!cache.contains("abc123", "serverKeyTest"));
    }

    #[test]
    fn test_master_key_cache_across_threads() {
        let cache = MasterKeyCache::new(16);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let cache = cache.clone();
                scope.spawn(move || {
                    assert_eq!(
                        cache.get_or_derive("client", "server"),
                        derive_master_key("client", "server")
                    );
                });
            }
        });
        assert!(cache.contains("client", "server"));
    }

    #[tokio::test]
    async fn test_async_cache() {
        let cache = new_async_cache(Duration::from_secs(1));

        cache.insert("key1", "value1").await;
        assert_eq!(cache.get(&"key1").await, Some("value1"));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(cache.get(&"key1").await, None);
    }
}
