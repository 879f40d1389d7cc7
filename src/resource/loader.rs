//! Slot binding with a staleness guard.
//!
//! A slot (a recycled cell's image holder, say) is bound to one key at a
//! time. Fetches run on a fixed pool of worker threads and always store their bytes in the
//! shared [`ResourceCache`]; the result is delivered to the slot only if, when
//! the owner applies it, the slot is still bound to the same key. Rebinding
//! is the only cancellation: it does not stop the fetch, it suppresses the
//! delivery.

use super::cache::{CacheEntry, ResourceCache};
use super::fetcher::ResourceFetcher;
use crate::model::error::ResourceFetchError;
use crate::model::SlotId;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of [`ResourceLoader::bind`].
#[derive(Debug, Clone, PartialEq)]
pub enum BindOutcome {
    /// The key was cached; show it now.
    Ready(Arc<CacheEntry>),
    /// A fetch was started; the result arrives through `poll`/`wait`.
    Pending,
}

/// A delivery for a slot that is still bound to the fetched key.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotUpdate {
    /// Bytes arrived.
    Loaded {
        /// Receiving slot.
        slot: SlotId,
        /// Stored entry.
        entry: Arc<CacheEntry>,
    },
    /// The fetch failed; the slot stays without an image.
    Failed {
        /// Receiving slot.
        slot: SlotId,
        /// Cause.
        error: ResourceFetchError,
    },
}

impl SlotUpdate {
    /// Slot the update is for.
    pub fn slot(&self) -> SlotId {
        match self {
            Self::Loaded { slot, .. } | Self::Failed { slot, .. } => *slot,
        }
    }
}

/// Fetch threads a loader starts unless told otherwise.
pub const DEFAULT_RESOURCE_WORKERS: usize = 4;

#[derive(Debug)]
struct FetchDone {
    slot: SlotId,
    key: String,
    result: Result<Arc<CacheEntry>, ResourceFetchError>,
}

#[derive(Debug)]
struct FetchJob {
    slot: SlotId,
    key: String,
}

/// Binds slots to keys and delivers fetched resources to the owner.
///
/// Fetches run on a fixed pool of worker threads fed from one job queue, so
/// the number of live fetch threads never exceeds the pool size no matter how
/// many keys are bound. Dropping the loader closes the queue; workers exit
/// once their current fetch returns.
pub struct ResourceLoader<F> {
    cache: ResourceCache,
    fetcher: Arc<F>,
    bindings: HashMap<SlotId, String>,
    in_flight: usize,
    workers: usize,
    jobs: Sender<FetchJob>,
    tx: Sender<FetchDone>,
    rx: Receiver<FetchDone>,
}

impl<F: ResourceFetcher> ResourceLoader<F> {
    /// Loader fetching through `fetcher` into the shared `cache` on
    /// [`DEFAULT_RESOURCE_WORKERS`] threads.
    pub fn new(cache: ResourceCache, fetcher: F) -> Self {
        Self::with_workers(cache, fetcher, DEFAULT_RESOURCE_WORKERS)
    }

    /// Loader with a pool of `workers` fetch threads (at least one).
    pub fn with_workers(cache: ResourceCache, fetcher: F, workers: usize) -> Self {
        let (tx, rx) = mpsc::channel();
        let (jobs, queue) = mpsc::channel::<FetchJob>();
        let queue = Arc::new(Mutex::new(queue));
        let fetcher = Arc::new(fetcher);

        let mut spawned = 0;
        for n in 0..workers.max(1) {
            let worker = Worker {
                queue: Arc::clone(&queue),
                cache: cache.clone(),
                fetcher: Arc::clone(&fetcher),
                done: tx.clone(),
            };
            match thread::Builder::new()
                .name(format!("reviewfeed-resource-{n}"))
                .spawn(move || worker.run())
            {
                Ok(_) => spawned += 1,
                Err(e) => warn!(error = %e, "Failed to start resource worker"),
            }
        }
        debug!(workers = spawned, "Resource workers started");

        Self {
            cache,
            fetcher,
            bindings: HashMap::new(),
            in_flight: 0,
            workers: spawned,
            jobs,
            tx,
            rx,
        }
    }

    /// Number of fetch threads in the pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The shared cache.
    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// The fetcher the workers share.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Key `slot` currently wants.
    pub fn bound_key(&self, slot: SlotId) -> Option<&str> {
        self.bindings.get(&slot).map(String::as_str)
    }

    /// Fetches started and not yet applied by the owner.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Record that `slot` wants `key`.
    ///
    /// A cached key is returned immediately. Otherwise a fetch is queued for
    /// the worker pool; concurrent binds of the same uncached key each fetch.
    pub fn bind(&mut self, slot: SlotId, key: impl Into<String>) -> BindOutcome {
        let key = key.into();
        self.bindings.insert(slot, key.clone());

        if let Some(entry) = self.cache.lookup(&key) {
            debug!(%slot, key = %key, "Resource cache hit");
            return BindOutcome::Ready(entry);
        }

        debug!(%slot, key = %key, "Queueing resource fetch");
        self.in_flight += 1;
        let job = FetchJob {
            slot,
            key: key.clone(),
        };
        if self.jobs.send(job).is_err() {
            let error = ResourceFetchError::WorkerUnavailable {
                key: key.clone(),
                reason: "no resource worker running".to_string(),
            };
            let _ = self.tx.send(FetchDone {
                slot,
                key,
                result: Err(error),
            });
        }
        BindOutcome::Pending
    }

    /// Release `slot`. Any outstanding fetch for it will not be delivered.
    pub fn unbind(&mut self, slot: SlotId) -> Option<String> {
        self.bindings.remove(&slot)
    }

    /// Apply every finished fetch without blocking.
    pub fn poll(&mut self) -> Vec<SlotUpdate> {
        let mut updates = Vec::new();
        while let Ok(done) = self.rx.try_recv() {
            self.apply(done, &mut updates);
        }
        updates
    }

    /// Block until at least one update is delivered, nothing is in flight, or
    /// `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Vec<SlotUpdate> {
        let deadline = Instant::now() + timeout;
        let mut updates = self.poll();
        while updates.is_empty() && self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) => self.apply(done, &mut updates),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        updates
    }

    fn apply(&mut self, done: FetchDone, updates: &mut Vec<SlotUpdate>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.bindings.get(&done.slot) != Some(&done.key) {
            debug!(
                slot = %done.slot,
                key = %done.key,
                bound = ?self.bindings.get(&done.slot),
                "Suppressing stale resource delivery"
            );
            return;
        }

        match done.result {
            Ok(entry) => updates.push(SlotUpdate::Loaded {
                slot: done.slot,
                entry,
            }),
            Err(error) => {
                warn!(slot = %done.slot, error = %error, "Resource fetch failed");
                updates.push(SlotUpdate::Failed {
                    slot: done.slot,
                    error,
                });
            }
        }
    }
}

struct Worker<F> {
    queue: Arc<Mutex<Receiver<FetchJob>>>,
    cache: ResourceCache,
    fetcher: Arc<F>,
    done: Sender<FetchDone>,
}

impl<F: ResourceFetcher> Worker<F> {
    fn run(self) {
        loop {
            let job = self
                .queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .recv();
            let Ok(FetchJob { slot, key }) = job else {
                break;
            };

            let result = self
                .fetcher
                .fetch(&key)
                .map(|bytes| self.cache.store(key.clone(), bytes));
            if self.done.send(FetchDone { slot, key, result }).is_err() {
                break;
            }
        }
    }
}

impl<F> std::fmt::Debug for ResourceLoader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("bindings", &self.bindings)
            .field("in_flight", &self.in_flight)
            .field("workers", &self.workers)
            .finish()
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
