//! Shared byte cache keyed by URL.

use chrono::{DateTime, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Capacity used when a caller asks for zero.
pub const DEFAULT_RESOURCE_CACHE_CAPACITY: usize = 256;

/// One stored resource. Immutable once stored; a later store for the same key
/// replaces the entry rather than mutating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Resource key (URL).
    pub key: String,
    /// Resource bytes.
    pub bytes: Vec<u8>,
    /// When the entry was stored.
    pub stored_at: DateTime<Utc>,
}

/// Bounded LRU cache of resource bytes.
///
/// Cloning is cheap and every clone shares the same storage, so one instance
/// can be injected into any number of loaders and workers. Eviction is
/// best-effort: entries may disappear at any time once capacity is reached.
#[derive(Debug, Clone)]
pub struct ResourceCache {
    inner: Arc<Mutex<LruCache<String, Arc<CacheEntry>>>>,
}

impl ResourceCache {
    /// Create a cache. A capacity of 0 falls back to [`DEFAULT_RESOURCE_CACHE_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_RESOURCE_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<CacheEntry>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `bytes` under `key`, replacing any previous entry.
    pub fn store(&self, key: impl Into<String>, bytes: Vec<u8>) -> Arc<CacheEntry> {
        let key = key.into();
        let entry = Arc::new(CacheEntry {
            key: key.clone(),
            bytes,
            stored_at: Utc::now(),
        });
        self.lock().put(key, Arc::clone(&entry));
        entry
    }

    /// Entry for `key`, if still cached. Counts as a use for eviction order.
    pub fn lookup(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.lock().get(key).cloned()
    }

    /// True if `key` is cached. Does not affect eviction order.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCE_CACHE_CAPACITY)
    }
}
