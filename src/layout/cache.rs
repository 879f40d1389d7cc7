//! LRU cache for computed row layouts.

use super::engine::{LayoutEngine, LayoutResult};
use super::metrics::TextMeasurer;
use crate::model::{RowId, RowViewModel};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Capacity used when a caller asks for zero.
pub const DEFAULT_LAYOUT_CACHE_CAPACITY: usize = 1000;

/// Key for layout cache lookup.
///
/// Includes every input that changes a row's geometry, so an expanded row or a
/// resized viewport is simply a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutCacheKey {
    /// Row identity.
    pub row: RowId,
    /// Bit pattern of the max width the layout was computed for.
    pub width_bits: u64,
    /// Line limit of the body at compute time.
    pub max_visible_lines: usize,
}

impl LayoutCacheKey {
    /// Key for `row` laid out at `width`.
    pub fn new(row: &RowViewModel, width: f64) -> Self {
        Self {
            row: row.id(),
            width_bits: width.to_bits(),
            max_visible_lines: row.max_visible_lines(),
        }
    }
}

/// Bounded memo of [`LayoutResult`]s with LRU eviction.
pub struct LayoutCache {
    cache: LruCache<LayoutCacheKey, LayoutResult>,
}

impl LayoutCache {
    /// Create a cache. A capacity of 0 falls back to [`DEFAULT_LAYOUT_CACHE_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_LAYOUT_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Cached layout for `row` at `width`, computing and storing it on a miss.
    pub fn get_or_compute<M: TextMeasurer>(
        &mut self,
        engine: &LayoutEngine<M>,
        row: &RowViewModel,
        width: f64,
    ) -> LayoutResult {
        let key = LayoutCacheKey::new(row, width);
        *self
            .cache
            .get_or_insert(key, || engine.compute(row, width))
    }

    /// Look up without computing. Updates LRU ordering.
    pub fn get(&mut self, key: &LayoutCacheKey) -> Option<&LayoutResult> {
        self.cache.get(key)
    }

    /// Drop every cached layout.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of cached layouts.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Maximum number of cached layouts.
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new(DEFAULT_LAYOUT_CACHE_CAPACITY)
    }
}
