//! In-memory embedding cache.
//!
//! Keys are BLAKE3 hashes of the exact input text (see [`crate::hashing`]).
//! Entries are bounded by count (LRU eviction) and by age (TTL measured from
//! insertion; reads refresh recency but never age). The cache only ever saves
//! provider calls: a miss and a hit produce the same vector.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use serde::Serialize;

use crate::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
use crate::hashing::hash_text;

/// Construction-time bounds for an [`EmbeddingCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Max live entries before LRU eviction. Default: `1000`.
    pub capacity: u64,
    /// Max entry age. Default: 24h.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// A stored vector plus its insertion time.
#[derive(Debug, Clone)]
pub struct CachedEmbedding {
    vector: Arc<[f32]>,
    inserted_at: DateTime<Utc>,
}

impl CachedEmbedding {
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn inserted_at(&self) -> DateTime<Utc> {
        self.inserted_at
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Capacity- and age-bounded map from text to embedding.
pub struct EmbeddingCache {
    entries: Cache<[u8; 32], CachedEmbedding>,
    hits: AtomicU64,
    misses: AtomicU64,
    config: CacheConfig,
}

impl EmbeddingCache {
    /// Creates a cache with the default bounds.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with explicit capacity and TTL.
    pub fn with_config(config: CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(config.ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self {
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the cached vector for `text`, if present and not expired.
    #[inline]
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        self.get_entry(text).map(|entry| entry.vector.to_vec())
    }

    /// Like [`get`](Self::get) but returns the entry with its insertion time.
    pub fn get_entry(&self, text: &str) -> Option<CachedEmbedding> {
        let key = hash_text(text);
        match self.entries.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Stores `vector` for `text`, replacing any previous entry.
    ///
    /// The whole vector is inserted as one value, so concurrent readers see
    /// either the old entry or the new one.
    #[inline]
    pub fn set(&self, text: &str, vector: &[f32]) {
        let key = hash_text(text);
        self.entries.insert(
            key,
            CachedEmbedding {
                vector: Arc::from(vector),
                inserted_at: Utc::now(),
            },
        );
    }

    /// Returns `true` if a live entry exists. Does not touch counters or recency.
    #[inline]
    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(&hash_text(text))
    }

    /// Removes every entry and resets the hit/miss counters.
    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Returns the number of live entries (after pending maintenance runs).
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs pending eviction/expiry work in the underlying cache.
    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        };

        CacheStats {
            size: self.len(),
            hits,
            misses,
            hit_rate,
        }
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("entries", &self.entries.entry_count())
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Clone)]
/// Shared handle to an [`EmbeddingCache`].
///
/// Clone the handle to share one cache between clients on purpose; separate
/// handles built with [`EmbeddingCacheHandle::new`] never share entries.
pub struct EmbeddingCacheHandle {
    inner: Arc<EmbeddingCache>,
}

impl EmbeddingCacheHandle {
    #[inline]
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    #[inline]
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(EmbeddingCache::with_config(config)),
        }
    }

    #[inline]
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        self.inner.get(text)
    }

    #[inline]
    pub fn get_entry(&self, text: &str) -> Option<CachedEmbedding> {
        self.inner.get_entry(text)
    }

    #[inline]
    pub fn set(&self, text: &str, vector: &[f32]) {
        self.inner.set(text, vector)
    }

    #[inline]
    pub fn contains(&self, text: &str) -> bool {
        self.inner.contains(text)
    }

    #[inline]
    pub fn clear(&self) {
        self.inner.clear()
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks()
    }

    /// Returns the number of strong references to the underlying cache.
    #[inline]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl Default for EmbeddingCacheHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EmbeddingCacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCacheHandle")
            .field("strong_count", &self.strong_count())
            .finish()
    }
}
