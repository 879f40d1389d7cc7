//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Keeps the cumulative heights of a list of rows so a host can answer
//! "how tall is the content" and "which row is at this offset" without
//! re-summing after every expand.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: amortised O(log n)
//! - `total`: O(log n)
//! - `len`, `get`: O(1)

/// Fenwick tree over row heights, exposed with a 0-indexed API.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage; `tree.len()` is the capacity.
    tree: Vec<f64>,
    /// Plain heights, for O(1) reads and for rebuilding on growth.
    heights: Vec<f64>,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` rows.
    ///
    /// ```
    /// # use reviewfeed::layout::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0.0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0.0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True when the index holds no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Height of row `index`, if present.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.heights.get(index).copied()
    }

    /// Appends a row.
    ///
    /// ```
    /// # use reviewfeed::layout::HeightIndex;
    /// let mut index = HeightIndex::new(1);
    /// index.push(5.0);
    /// index.push(3.0);
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.total(), 8.0);
    /// ```
    pub fn push(&mut self, height: f64) {
        let index = self.heights.len();
        self.heights.push(height);
        if index >= self.tree.len() {
            // Growing changes which nodes cover which ranges; rebuild from scratch.
            self.rebuild((self.tree.len() * 2).max(16));
        } else {
            fenwick::array::update(&mut self.tree, index, height);
        }
    }

    /// Replaces the height of row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: f64) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );
        let delta = height - self.heights[index];
        self.heights[index] = height;
        if delta != 0.0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Sum of heights of rows `0..=index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn prefix_sum(&self, index: usize) -> f64 {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );
        fenwick::array::prefix_sum(&self.tree, index)
    }

    /// Y offset of the top edge of row `index` (sum of rows before it).
    pub fn offset_of(&self, index: usize) -> f64 {
        if index == 0 {
            0.0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// Total height of all rows.
    pub fn total(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }

    /// Index of the row containing vertical offset `value`.
    ///
    /// Row `i` covers `[offset_of(i), offset_of(i) + height(i))`. Returns `None`
    /// when `value` is at or past the end of the content.
    ///
    /// ```
    /// # use reviewfeed::layout::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(10.0);
    /// index.push(20.0);
    /// assert_eq!(index.lower_bound(0.0), Some(0));
    /// assert_eq!(index.lower_bound(10.0), Some(1));
    /// assert_eq!(index.lower_bound(29.5), Some(1));
    /// assert_eq!(index.lower_bound(30.0), None);
    /// ```
    pub fn lower_bound(&self, value: f64) -> Option<usize> {
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Removes every row. Keeps allocated capacity.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0.0);
        self.heights.clear();
    }

    fn rebuild(&mut self, capacity: usize) {
        self.tree.clear();
        self.tree.resize(capacity, 0.0);
        for (index, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, index, height);
        }
    }
}
