//! List state owned by the pagination controller.

use crate::model::{RowId, RowViewModel};

/// One page request. Immutable per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// Index of the first item to fetch.
    pub offset: usize,
    /// Maximum number of items to fetch; always greater than zero.
    pub limit: usize,
}

impl PageRequest {
    /// Create a request.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn new(offset: usize, limit: usize) -> Self {
        assert!(limit > 0, "page limit must be positive");
        Self { offset, limit }
    }

    /// One past the last index this request covers.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }
}

/// Snapshot of the feed: which rows exist and whether more may be fetched.
///
/// # Invariants
///
/// - `offset` never decreases except on refresh, where it resets to 0
/// - `should_load` is false exactly while a fetch is outstanding, or once every
///   page has been consumed
/// - `items.len() <= total_count` once `total_count` is known
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    pub(crate) items: Vec<RowViewModel>,
    pub(crate) offset: usize,
    pub(crate) limit: usize,
    pub(crate) should_load: bool,
    pub(crate) total_count: Option<usize>,
}

impl ListState {
    /// Empty state ready to load its first page of `limit` items.
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            limit,
            should_load: true,
            total_count: None,
        }
    }

    /// Rows in display order.
    pub fn items(&self) -> &[RowViewModel] {
        &self.items
    }

    /// Offset of the next page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Page size.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether a `load()` would issue a request.
    pub fn should_load(&self) -> bool {
        self.should_load
    }

    /// Total items the provider reported, once a page has arrived.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of the row with `id`.
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.items.iter().position(|row| row.id() == id)
    }

    /// True once every page has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.total_count
            .is_some_and(|total| self.offset >= total)
    }

    /// The request the next `load()` would issue.
    pub fn next_request(&self) -> PageRequest {
        PageRequest::new(self.offset, self.limit)
    }
}
