//! Tests for slot binding and the staleness guard.

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const WAIT: Duration = Duration::from_secs(5);

/// Answers ungated keys immediately with the key's bytes; gated keys block
/// until the test releases them.
#[derive(Default)]
struct GatedFetcher {
    gates: Mutex<HashMap<String, Receiver<Result<Vec<u8>, ResourceFetchError>>>>,
    calls: AtomicUsize,
}

impl GatedFetcher {
    fn gate(&self, key: &str) -> Sender<Result<Vec<u8>, ResourceFetchError>> {
        let (tx, rx) = mpsc::channel();
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }
}

impl ResourceFetcher for GatedFetcher {
    fn fetch(&self, key: &str) -> Result<Vec<u8>, ResourceFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().remove(key);
        match gate {
            Some(rx) => rx.recv().unwrap_or_else(|_| {
                Err(ResourceFetchError::Transport {
                    key: key.to_string(),
                    reason: "gate dropped".to_string(),
                })
            }),
            None => Ok(key.as_bytes().to_vec()),
        }
    }
}

impl ResourceFetcher for Arc<GatedFetcher> {
    fn fetch(&self, key: &str) -> Result<Vec<u8>, ResourceFetchError> {
        (**self).fetch(key)
    }
}

fn loader() -> (ResourceLoader<Arc<GatedFetcher>>, Arc<GatedFetcher>) {
    let fetcher = Arc::new(GatedFetcher::default());
    (
        ResourceLoader::new(ResourceCache::new(16), Arc::clone(&fetcher)),
        fetcher,
    )
}

const SLOT: SlotId = SlotId::new(1);
const OTHER_SLOT: SlotId = SlotId::new(2);
const K: &str = "https://cdn.example/k.jpg";
const J: &str = "https://cdn.example/j.jpg";

#[test]
fn uncached_bind_fetches_and_delivers() {
    let (mut loader, _) = loader();

    assert_eq!(loader.bind(SLOT, K), BindOutcome::Pending);
    let updates = loader.wait(WAIT);

    assert_eq!(updates.len(), 1);
    match &updates[0] {
        SlotUpdate::Loaded { slot, entry } => {
            assert_eq!(*slot, SLOT);
            assert_eq!(entry.key, K);
            assert_eq!(entry.bytes, K.as_bytes());
        }
        other => panic!("Expected Loaded, got {other:?}"),
    }
    assert_eq!(loader.in_flight(), 0);
}

#[test]
fn cached_bind_is_ready_without_fetching() {
    let (mut loader, fetcher) = loader();
    loader.cache().store(K, vec![7]);

    match loader.bind(SLOT, K) {
        BindOutcome::Ready(entry) => assert_eq!(entry.bytes, vec![7]),
        BindOutcome::Pending => panic!("Expected cache hit"),
    }
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(loader.in_flight(), 0);
}

#[test]
fn rebound_slot_never_receives_outdated_bytes() {
    let (mut loader, fetcher) = loader();
    let release_k = fetcher.gate(K);

    loader.bind(SLOT, K);
    loader.bind(SLOT, J);
    let first = loader.wait(WAIT);
    assert_eq!(first.len(), 1);
    assert!(matches!(&first[0], SlotUpdate::Loaded { entry, .. } if entry.key == J));

    release_k.send(Ok(b"old".to_vec())).unwrap();
    let late = loader.wait(WAIT);

    assert!(late.is_empty(), "K's bytes must not reach the rebound slot");
    assert_eq!(loader.in_flight(), 0);
    assert_eq!(loader.bound_key(SLOT), Some(J));
    assert_eq!(
        loader.cache().lookup(K).map(|e| e.bytes.clone()),
        Some(b"old".to_vec()),
        "Suppressed fetch still fills the cache"
    );
}

#[test]
fn suppressed_fetch_benefits_a_later_bind() {
    let (mut loader, fetcher) = loader();
    let release_k = fetcher.gate(K);

    loader.bind(SLOT, K);
    loader.bind(SLOT, J);
    release_k.send(Ok(vec![1, 2])).unwrap();
    while loader.in_flight() > 0 {
        loader.wait(WAIT);
    }

    assert!(matches!(loader.bind(OTHER_SLOT, K), BindOutcome::Ready(_)));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn unbound_slot_receives_nothing() {
    let (mut loader, fetcher) = loader();
    let release = fetcher.gate(K);

    loader.bind(SLOT, K);
    assert_eq!(loader.unbind(SLOT), Some(K.to_string()));
    release.send(Ok(vec![1])).unwrap();

    assert!(loader.wait(WAIT).is_empty());
    assert!(loader.cache().contains(K));
}

#[test]
fn failed_fetch_is_reported_and_not_cached() {
    let (mut loader, fetcher) = loader();
    let release = fetcher.gate(K);

    loader.bind(SLOT, K);
    release
        .send(Err(ResourceFetchError::Status {
            key: K.to_string(),
            status: 404,
        }))
        .unwrap();
    let updates = loader.wait(WAIT);

    assert_eq!(
        updates,
        vec![SlotUpdate::Failed {
            slot: SLOT,
            error: ResourceFetchError::Status {
                key: K.to_string(),
                status: 404
            },
        }]
    );
    assert!(!loader.cache().contains(K));
}

#[test]
fn rebinding_same_key_after_failure_retries() {
    let (mut loader, fetcher) = loader();
    drop(fetcher.gate(K));

    loader.bind(SLOT, K);
    let failed = loader.wait(WAIT);
    assert!(matches!(failed[0], SlotUpdate::Failed { .. }));

    loader.bind(SLOT, K);
    let retried = loader.wait(WAIT);

    assert!(matches!(retried[0], SlotUpdate::Loaded { .. }));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn two_slots_same_key_fetch_independently() {
    let (mut loader, fetcher) = loader();
    let release = fetcher.gate(K);

    assert_eq!(loader.bind(SLOT, K), BindOutcome::Pending);
    assert_eq!(loader.bind(OTHER_SLOT, K), BindOutcome::Pending);
    release.send(Ok(vec![3])).unwrap();
    let mut updates = Vec::new();
    while loader.in_flight() > 0 {
        updates.extend(loader.wait(WAIT));
    }

    let mut slots: Vec<SlotId> = updates.iter().map(SlotUpdate::slot).collect();
    slots.sort();
    assert_eq!(slots, vec![SLOT, OTHER_SLOT]);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn poll_without_work_is_empty() {
    let (mut loader, _) = loader();
    assert!(loader.poll().is_empty());
    assert!(loader.wait(Duration::from_millis(1)).is_empty());
}

/// Records how many fetches run at the same time.
#[derive(Default)]
struct CountingFetcher {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ResourceFetcher for CountingFetcher {
    fn fetch(&self, key: &str) -> Result<Vec<u8>, ResourceFetchError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(5));
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(key.as_bytes().to_vec())
    }
}

#[test]
fn more_keys_than_workers_all_deliver_through_the_pool() {
    let mut loader =
        ResourceLoader::with_workers(ResourceCache::new(64), CountingFetcher::default(), 2);
    assert_eq!(loader.workers(), 2);

    for n in 0..40u64 {
        let key = format!("https://cdn.example/{n}.jpg");
        assert_eq!(loader.bind(SlotId::new(n), key), BindOutcome::Pending);
    }
    assert_eq!(loader.in_flight(), 40);

    let mut updates = Vec::new();
    while loader.in_flight() > 0 {
        let batch = loader.wait(WAIT);
        assert!(!batch.is_empty(), "pool stalled with {} in flight", loader.in_flight());
        updates.extend(batch);
    }

    let mut slots: Vec<u64> = updates
        .iter()
        .map(|update| match update {
            SlotUpdate::Loaded { slot, entry } => {
                assert_eq!(entry.key, format!("https://cdn.example/{}.jpg", slot.get()));
                slot.get()
            }
            SlotUpdate::Failed { error, .. } => panic!("unexpected failure: {error}"),
        })
        .collect();
    slots.sort_unstable();
    assert_eq!(slots, (0..40).collect::<Vec<_>>());
    assert!(loader.fetcher().peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(loader.cache().len(), 40);
}

#[test]
fn zero_workers_still_starts_one() {
    let mut loader =
        ResourceLoader::with_workers(ResourceCache::new(4), GatedFetcher::default(), 0);
    assert_eq!(loader.workers(), 1);

    loader.bind(SLOT, K);
    let updates = loader.wait(WAIT);
    assert_eq!(updates.len(), 1);
    assert!(matches!(updates[0], SlotUpdate::Loaded { .. }));
}
