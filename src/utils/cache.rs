//! In-Memory TTL Cache Module
//!
//! Thread-safe caching layer for content documents and verification results.
//! Uses DashMap for concurrent access without lock contention.
//!
//! Features:
//! - TTL-based expiration (5 minute default)
//! - Key normalization (lowercase)
//! - Cache HIT/MISS logging
//! - Hit/miss counters for the stats endpoint

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::utils::constants::DEFAULT_CONTENT_TTL_SECS;

/// Cache entry with creation timestamp for TTL validation
#[derive(Clone, Debug)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: Instant,
    pub ttl_secs: u64,
}

impl<T> CacheEntry<T> {
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > Duration::from_secs(self.ttl_secs)
    }

    /// Seconds left before the entry expires
    pub fn remaining_ttl(&self) -> u64 {
        let elapsed = self.created_at.elapsed().as_secs();
        self.ttl_secs.saturating_sub(elapsed)
    }
}

/// TTL cache over cloneable values, keyed by normalized string
#[derive(Clone)]
pub struct TtlCache<T: Clone> {
    store: Arc<DashMap<String, CacheEntry<T>>>,
    ttl_secs: u64,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TtlCache<T> {
    /// New cache with the default TTL (5 minutes)
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CONTENT_TTL_SECS)
    }

    /// New cache with a custom TTL
    pub fn with_ttl(ttl_secs: u64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl_secs,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn normalize_key(key: &str) -> String {
        key.to_lowercase()
    }

    /// Get with TTL validation. Expired entries are removed on access.
    pub fn get(&self, key: &str) -> Option<T> {
        let key = Self::normalize_key(key);

        if let Some(entry) = self.store.get(&key) {
            if entry.is_expired() {
                drop(entry); // release read lock before remove
                self.store.remove(&key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("CACHE MISS (expired): {}", key);
                None
            } else {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("CACHE HIT: {} (TTL: {}s remaining)", key, entry.remaining_ttl());
                Some(entry.value.clone())
            }
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("CACHE MISS: {}", key);
            None
        }
    }

    /// Insert with the cache's TTL
    pub fn set(&self, key: &str, value: T) {
        let key = Self::normalize_key(key);
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            ttl_secs: self.ttl_secs,
        };

        self.store.insert(key.clone(), entry);
        debug!("CACHE SET: {} (TTL: {}s)", key, self.ttl_secs);
    }

    /// Drop a single entry (used after content edits)
    pub fn invalidate(&self, key: &str) {
        let key = Self::normalize_key(key);
        self.store.remove(&key);
        debug!("CACHE INVALIDATE: {}", key);
    }

    /// Remove every expired entry, returns how many were dropped
    pub fn cleanup_expired(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired());
        let removed = before - self.store.len();
        if removed > 0 {
            info!("CACHE CLEANUP: {} expired entries removed", removed);
        }
        removed
    }

    /// Snapshot of cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_secs: self.ttl_secs,
        }
    }

    /// Clear everything
    #[allow(dead_code)]
    pub fn clear(&self) {
        self.store.clear();
        info!("CACHE CLEARED");
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_set_get() {
        let cache = TtlCache::new();
        cache.set("home", "hero".to_string());

        let result = cache.get("home");
        assert_eq!(result.as_deref(), Some("hero"));
    }

    #[test]
    fn test_key_normalization() {
        let cache = TtlCache::new();

        cache.set("DONATE", 42u32);

        // Get with lowercase - should hit
        let result = cache.get("donate");
        assert_eq!(result, Some(42));
    }

    #[test]
    fn test_cache_miss() {
        let cache: TtlCache<String> = TtlCache::new();
        assert!(cache.get("nonexistent").is_none());
    }

    #[test]
    fn test_expired_entry_is_removed() {
        let cache = TtlCache::with_ttl(0);
        cache.set("home", 1u32);

        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("home").is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_cache_stats() {
        let cache = TtlCache::new();

        cache.set("home", 1u32);
        cache.get("home"); // HIT
        cache.get("about"); // MISS

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
