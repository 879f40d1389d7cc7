//! Paginated list controller.
//!
//! Single source of truth for which rows exist, in what order, and whether
//! another page should be fetched. All state lives on the owning context:
//! providers answer on any thread, but their results only take effect when
//! the owner calls [`PaginationController::process_completions`] or
//! [`PaginationController::wait_for_completion`].
//!
//! # Fetch gate
//!
//! `should_load` is cleared when a request is issued and set again when it
//! completes (unless every page has been consumed), so at most one page fetch
//! is outstanding and completions apply in request order.
//!
//! # Refresh
//!
//! `refresh()` starts a new generation. A completion from an older generation
//! is discarded on arrival, so a page requested before the refresh can never be
//! appended to the refreshed list.

use super::mapper::RowMapper;
use super::notify::{Notifier, Subscription};
use super::prefetch::{PrefetchPolicy, ScrollMetrics};
use super::provider::{Completion, DataProvider, PageReply};
use super::state::{ListState, PageRequest};
use crate::model::error::FetchError;
use crate::model::{RawPage, RowId};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Coordinates page fetches, list state and renderer notifications.
pub struct PaginationController<P> {
    provider: P,
    mapper: RowMapper,
    prefetch: PrefetchPolicy,
    state: ListState,
    notifier: Notifier,
    generation: u64,
    is_refreshing: bool,
    in_flight: Option<PageRequest>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl<P: DataProvider> PaginationController<P> {
    /// Controller fetching pages of `limit` rows from `provider`.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn new(provider: P, mapper: RowMapper, limit: usize) -> Self {
        assert!(limit > 0, "page limit must be positive");
        let (tx, rx) = mpsc::channel();
        Self {
            provider,
            mapper,
            prefetch: PrefetchPolicy::default(),
            state: ListState::new(limit),
            notifier: Notifier::new(),
            generation: 0,
            is_refreshing: false,
            in_flight: None,
            tx,
            rx,
        }
    }

    /// Replace the prefetch threshold used by [`Self::on_scroll_will_end`].
    pub fn with_prefetch_policy(mut self, policy: PrefetchPolicy) -> Self {
        self.prefetch = policy;
        self
    }

    /// Current list state.
    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// The data provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Prefetch threshold in use.
    pub fn prefetch_policy(&self) -> PrefetchPolicy {
        self.prefetch
    }

    /// True while a page fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True between `refresh()` and the completion of its first page.
    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    /// Register a state-changed handler.
    pub fn on_state_change<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&ListState) + Send + 'static,
    {
        self.notifier.on_state_change(handler)
    }

    /// Register a footer handler; receives the item count.
    pub fn on_footer_update<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.notifier.on_footer_update(handler)
    }

    /// Register a refresh-completed handler.
    pub fn on_refresh_complete<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut() + Send + 'static,
    {
        self.notifier.on_refresh_complete(handler)
    }

    /// Remove a handler. Returns true if it was registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.notifier.unsubscribe(subscription)
    }

    /// Request the next page, unless loading is currently disallowed.
    ///
    /// Returns true if a request was issued. A call while a fetch is
    /// outstanding, or after the last page, is silently ignored.
    pub fn load(&mut self) -> bool {
        if !self.state.should_load {
            debug!(
                offset = self.state.offset,
                loading = self.is_loading(),
                "Load ignored"
            );
            return false;
        }

        self.state.should_load = false;
        let request = self.state.next_request();
        self.in_flight = Some(request);
        debug!(
            offset = request.offset,
            limit = request.limit,
            generation = self.generation,
            "Requesting page"
        );

        let reply = PageReply::new(self.generation, request, self.tx.clone());
        self.provider.fetch_page(request, reply);
        true
    }

    /// Drop every row and reload from the first page.
    ///
    /// The completion of that page fires the refresh-completed notification.
    pub fn refresh(&mut self) {
        info!(rows = self.state.items.len(), "Refreshing feed");
        self.generation += 1;
        self.is_refreshing = true;
        self.in_flight = None;
        self.state.items.clear();
        self.state.offset = 0;
        self.state.should_load = true;
        self.load();
    }

    /// Apply the result of the outstanding page fetch.
    ///
    /// On success the page is mapped and appended and the offset advances by
    /// the page limit. On failure the list is untouched and loading is
    /// re-enabled. Notifications fire only when the list is non-empty:
    /// state changed, then refresh completed (if refreshing), then footer.
    pub fn on_page_fetched(&mut self, result: Result<RawPage, FetchError>) {
        self.in_flight = None;

        match result {
            Ok(page) => self.append_page(page),
            Err(e) => {
                warn!(error = %e, offset = self.state.offset, "Page fetch failed");
                self.state.should_load = true;
            }
        }

        let was_refreshing = std::mem::take(&mut self.is_refreshing);
        if self.state.items.is_empty() {
            debug!("List still empty, notifications suppressed");
            return;
        }

        self.notifier.state_changed(&self.state);
        if was_refreshing {
            self.notifier.refresh_completed();
        }
        self.notifier.footer_updated(self.state.items.len());
    }

    fn append_page(&mut self, mut page: RawPage) {
        let total = page.total_count;
        let room = total.saturating_sub(self.state.items.len());
        if page.items.len() > room {
            warn!(
                received = page.items.len(),
                room, total, "Page exceeds reported total, truncating"
            );
            page.items.truncate(room);
        }

        let mapper = &self.mapper;
        self.state
            .items
            .extend(page.items.iter().map(|item| mapper.map(item)));
        self.state.offset += self.state.limit;
        self.state.total_count = Some(total);
        self.state.should_load = self.state.offset < total;

        debug!(
            rows = self.state.items.len(),
            offset = self.state.offset,
            total,
            "Page applied"
        );
        if !self.state.should_load {
            info!(rows = self.state.items.len(), "Reached end of feed");
        }
    }

    /// Apply every completion that has already arrived, without blocking.
    ///
    /// Returns the number applied. Stale completions are discarded and not
    /// counted.
    pub fn process_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until the outstanding fetch completes or `timeout` elapses.
    ///
    /// Returns true if a completion was applied. Returns false immediately
    /// when nothing is outstanding.
    pub fn wait_for_completion(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.process_completions() > 0 {
                return true;
            }
            if !self.is_loading() {
                return false;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    if self.apply(completion) {
                        self.process_completions();
                        return true;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    debug!(?timeout, "Timed out waiting for page");
                    return false;
                }
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn apply(&mut self, completion: Completion) -> bool {
        if completion.generation != self.generation {
            debug!(
                offset = completion.request.offset,
                stale_generation = completion.generation,
                generation = self.generation,
                "Discarding page from before refresh"
            );
            return false;
        }
        if self.in_flight != Some(completion.request) {
            debug!(
                offset = completion.request.offset,
                "Discarding page that is no longer outstanding"
            );
            return false;
        }
        self.on_page_fetched(completion.result);
        true
    }

    /// Lift the line limit of the row with `id` and fire state changed.
    ///
    /// Returns false (and does nothing) when no such row exists. Idempotent.
    pub fn request_expand(&mut self, id: RowId) -> bool {
        let Some(row) = self.state.items.iter_mut().find(|row| row.id() == id) else {
            debug!(%id, "Expand for unknown row ignored");
            return false;
        };
        row.expand();
        self.notifier.state_changed(&self.state);
        true
    }

    /// Prefetch predicate with this controller's threshold.
    pub fn should_prefetch(&self, metrics: ScrollMetrics) -> bool {
        self.prefetch.should_prefetch(metrics)
    }

    /// Host hook for "scroll will end": loads the next page when near the end.
    ///
    /// Returns true if a request was issued.
    pub fn on_scroll_will_end(&mut self, metrics: ScrollMetrics) -> bool {
        self.should_prefetch(metrics) && self.load()
    }
}

impl<P> std::fmt::Debug for PaginationController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("rows", &self.state.items.len())
            .field("offset", &self.state.offset)
            .field("should_load", &self.state.should_load)
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
