//! Row heights for virtualized scrolling.
//!
//! Ties a [`LayoutCache`] to a [`HeightIndex`] so a host can keep the content
//! height and offset lookups current as pages arrive and rows expand.

use super::cache::LayoutCache;
use super::engine::LayoutEngine;
use super::height_index::HeightIndex;
use super::metrics::TextMeasurer;
use crate::model::{RowId, RowViewModel};
use tracing::debug;

/// Cumulative heights of the rows currently on screen.
pub struct RowHeights {
    index: HeightIndex,
    cache: LayoutCache,
    ids: Vec<RowId>,
    width_bits: Option<u64>,
}

impl RowHeights {
    /// Create an empty index backed by a layout cache of `cache_capacity` entries.
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            index: HeightIndex::new(0),
            cache: LayoutCache::new(cache_capacity),
            ids: Vec::new(),
            width_bits: None,
        }
    }

    /// Bring the index in line with `rows` laid out at `width`.
    ///
    /// Appended rows are pushed; rows whose geometry changed (an expand) are
    /// updated in place. A width change, a shrinking list or a different row
    /// at an existing position (a refresh) rebuilds from scratch.
    pub fn sync<M: TextMeasurer>(
        &mut self,
        rows: &[RowViewModel],
        engine: &LayoutEngine<M>,
        width: f64,
    ) {
        let width_changed = self.width_bits != Some(width.to_bits());
        let replaced = rows.len() < self.ids.len()
            || self.ids.iter().zip(rows).any(|(id, row)| *id != row.id());

        if width_changed || replaced {
            debug!(
                rows = rows.len(),
                width_changed, replaced, "Rebuilding row heights"
            );
            self.index.clear();
            self.ids.clear();
            self.width_bits = Some(width.to_bits());
        }

        for (i, row) in rows.iter().enumerate() {
            let height = self.cache.get_or_compute(engine, row, width).total_height;
            if i < self.index.len() {
                if self.index.get(i) != Some(height) {
                    self.index.set(i, height);
                }
            } else {
                self.index.push(height);
                self.ids.push(row.id());
            }
        }
    }

    /// Sum of all row heights.
    pub fn content_height(&self) -> f64 {
        self.index.total()
    }

    /// Index of the row under vertical offset `offset`.
    pub fn row_at(&self, offset: f64) -> Option<usize> {
        self.index.lower_bound(offset)
    }

    /// Y offset of the top of row `index`.
    pub fn row_offset(&self, index: usize) -> f64 {
        self.index.offset_of(index)
    }

    /// Height of row `index`.
    pub fn row_height(&self, index: usize) -> Option<f64> {
        self.index.get(index)
    }

    /// Number of tracked rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when no rows are tracked.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for RowHeights {
    fn default() -> Self {
        Self::new(super::cache::DEFAULT_LAYOUT_CACHE_CAPACITY)
    }
}
