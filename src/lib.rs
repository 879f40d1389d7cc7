//! reviewfeed
//!
//! Engine behind an infinite-scrolling list of reviews: a paginated list
//! controller, a deterministic row layout engine, and a staleness-guarded
//! resource cache.
//!
//! This is the library root. The core (`model`, `layout`, `pagination`,
//! `resource`) performs I/O only through injected collaborators; `config`,
//! `logging` and the binary form the impure shell.

pub mod config;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod resource;

// Headless driver used by the binary
pub mod integration;
