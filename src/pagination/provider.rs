//! Data providers and the reply channel they answer through.
//!
//! A provider receives a [`PageRequest`] together with a [`PageReply`] and
//! answers exactly once, from any thread. The reply marshals the result back
//! into the controller's completion queue; the controller applies it on its
//! own context. Dropping a reply without answering delivers
//! [`FetchError::Abandoned`], so the controller never waits forever on a
//! provider that lost a request.

use super::state::PageRequest;
use crate::model::error::{FetchError, InputError};
use crate::model::{decode_page, RawItem, RawPage};
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// A finished page fetch, queued for the owning context.
#[derive(Debug)]
pub(crate) struct Completion {
    pub(crate) generation: u64,
    pub(crate) request: PageRequest,
    pub(crate) result: Result<RawPage, FetchError>,
}

/// One-shot handle a provider answers a page request through.
///
/// `Send`, so it can move onto a worker thread.
#[derive(Debug)]
pub struct PageReply {
    generation: u64,
    request: PageRequest,
    tx: Option<Sender<Completion>>,
}

impl PageReply {
    pub(crate) fn new(generation: u64, request: PageRequest, tx: Sender<Completion>) -> Self {
        Self {
            generation,
            request,
            tx: Some(tx),
        }
    }

    /// The request being answered.
    pub fn request(&self) -> PageRequest {
        self.request
    }

    /// Deliver the result.
    pub fn send(mut self, result: Result<RawPage, FetchError>) {
        self.deliver(result);
    }

    fn deliver(&mut self, result: Result<RawPage, FetchError>) {
        if let Some(tx) = self.tx.take() {
            let completion = Completion {
                generation: self.generation,
                request: self.request,
                result,
            };
            if tx.send(completion).is_err() {
                debug!(offset = self.request.offset, "Controller gone, dropping page");
            }
        }
    }
}

impl Drop for PageReply {
    fn drop(&mut self) {
        if self.tx.is_some() {
            self.deliver(Err(FetchError::Abandoned));
        }
    }
}

/// Source of review pages.
///
/// # Contract
/// - `fetch_page` must not block the caller for the duration of the fetch;
///   slow work belongs on a worker thread that owns the `reply`
/// - Answer each request exactly once via [`PageReply::send`] (dropping the
///   reply counts as an answer: `Abandoned`)
pub trait DataProvider {
    /// Start fetching `request`; answer through `reply`.
    fn fetch_page(&self, request: PageRequest, reply: PageReply);
}

impl<P: DataProvider + ?Sized> DataProvider for Box<P> {
    fn fetch_page(&self, request: PageRequest, reply: PageReply) {
        (**self).fetch_page(request, reply)
    }
}

impl<P: DataProvider + ?Sized> DataProvider for Arc<P> {
    fn fetch_page(&self, request: PageRequest, reply: PageReply) {
        (**self).fetch_page(request, reply)
    }
}

/// Serves pages sliced out of a bundled JSON page file.
///
/// With a non-zero latency each answer is sent from a worker thread after
/// sleeping, which mimics a network round trip.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    items: Arc<Vec<RawItem>>,
    latency: Duration,
}

impl JsonFileProvider {
    /// Load every review from a page file.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist,
    /// `InputError::Decode` if it is not a review page and `InputError::Io`
    /// for other I/O errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path)?;
        let page = decode_page(&bytes).map_err(|e| InputError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), items = page.items.len(), "Loaded review fixture");
        Ok(Self::from_items(page.items))
    }

    /// Serve the given items.
    pub fn from_items(items: Vec<RawItem>) -> Self {
        Self {
            items: Arc::new(items),
            latency: Duration::ZERO,
        }
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of items available.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there is nothing to serve.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The page for `request`, clamped to the available items.
    pub fn page(&self, request: PageRequest) -> RawPage {
        slice_page(&self.items, request)
    }
}

fn slice_page(items: &[RawItem], request: PageRequest) -> RawPage {
    let start = request.offset.min(items.len());
    let end = request.end().min(items.len());
    RawPage {
        items: items[start..end].to_vec(),
        total_count: items.len(),
    }
}

impl DataProvider for JsonFileProvider {
    fn fetch_page(&self, request: PageRequest, reply: PageReply) {
        if self.latency.is_zero() {
            reply.send(Ok(self.page(request)));
            return;
        }

        let items = Arc::clone(&self.items);
        let latency = self.latency;
        let spawned = thread::Builder::new()
            .name("reviewfeed-fixture".to_string())
            .spawn(move || {
                thread::sleep(latency);
                reply.send(Ok(slice_page(&items, request)));
            });
        // A failed spawn drops the closure, and with it the reply (Abandoned).
        if let Err(e) = spawned {
            warn!(error = %e, "Failed to spawn fixture worker");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::mpsc;

    fn item(n: usize) -> RawItem {
        RawItem {
            first_name: format!("User{n}"),
            last_name: "Test".to_string(),
            rating: 5,
            text: format!("Review {n}"),
            created: "today".to_string(),
            photo_urls: None,
            avatar_url: None,
        }
    }

    fn reply(request: PageRequest) -> (PageReply, mpsc::Receiver<Completion>) {
        let (tx, rx) = mpsc::channel();
        (PageReply::new(1, request, tx), rx)
    }

    #[test]
    fn dropped_reply_delivers_abandoned() {
        let (reply, rx) = reply(PageRequest::new(0, 20));
        drop(reply);

        let completion = rx.try_recv().unwrap();
        assert_eq!(completion.result, Err(FetchError::Abandoned));
        assert_eq!(completion.generation, 1);
    }

    #[test]
    fn send_delivers_exactly_once() {
        let (reply, rx) = reply(PageRequest::new(0, 20));
        reply.send(Err(FetchError::Status { status: 500 }));

        assert_eq!(
            rx.try_recv().unwrap().result,
            Err(FetchError::Status { status: 500 })
        );
        assert!(rx.try_recv().is_err(), "Drop after send must not deliver again");
    }

    #[test]
    fn fixture_pages_are_clamped_slices() {
        let provider = JsonFileProvider::from_items((0..45).map(item).collect());

        let last = provider.page(PageRequest::new(40, 20));
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.total_count, 45);
        assert_eq!(last.items[0].first_name, "User40");

        let past_end = provider.page(PageRequest::new(60, 20));
        assert!(past_end.items.is_empty());
    }

    #[test]
    fn fixture_answers_inline_without_latency() {
        let provider = JsonFileProvider::from_items((0..3).map(item).collect());
        let (reply, rx) = reply(PageRequest::new(0, 20));

        provider.fetch_page(PageRequest::new(0, 20), reply);

        let page = rx.try_recv().unwrap().result.unwrap();
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn fixture_answers_from_worker_with_latency() {
        let provider = JsonFileProvider::from_items((0..3).map(item).collect())
            .with_latency(Duration::from_millis(10));
        let (reply, rx) = reply(PageRequest::new(0, 2));

        provider.fetch_page(PageRequest::new(0, 2), reply);

        let completion = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(completion.result.unwrap().items.len(), 2);
    }

    #[test]
    fn open_missing_file_is_file_not_found() {
        let err = JsonFileProvider::open("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, InputError::FileNotFound { .. }));
    }

    #[test]
    fn open_reads_page_file() {
        let dir = std::env::temp_dir().join(format!("reviewfeed-fixture-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reviews.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"items":[{{"first_name":"A","last_name":"B","rating":3,"text":"t","created":"c"}}],"count":1}}"#
        )
        .unwrap();

        let provider = JsonFileProvider::open(&path).unwrap();
        assert_eq!(provider.len(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_rejects_non_page_json() {
        let dir = std::env::temp_dir().join(format!("reviewfeed-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, b"[1, 2, 3]").unwrap();

        let err = JsonFileProvider::open(&path).unwrap_err();
        assert!(matches!(err, InputError::Decode { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
