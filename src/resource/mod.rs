//! Image and byte resources.
//!
//! [`ResourceCache`] is an explicitly constructed, shared LRU; inject the same
//! instance wherever resources are needed. [`ResourceLoader`] binds slots to
//! keys and fetches through a [`ResourceFetcher`] on worker threads.

pub mod cache;
pub mod fetcher;
pub mod loader;

pub use cache::{CacheEntry, ResourceCache, DEFAULT_RESOURCE_CACHE_CAPACITY};
pub use fetcher::{HttpFetcher, ResourceFetcher};
pub use loader::{BindOutcome, ResourceLoader, SlotUpdate, DEFAULT_RESOURCE_WORKERS};
