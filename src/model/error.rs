//! Error types for reviewfeed.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`FetchError`] - A page fetch failed (transport, HTTP status, decoding)
//! - [`ResourceFetchError`] - A single binary resource (thumbnail, avatar) failed to load
//! - [`InputError`] - A data source could not be constructed (fixture file, HTTP client)
//! - [`AppError`] - Top-level error of the binary, wrapping everything fatal
//!
//! # Recovery Strategy
//!
//! `FetchError` and `ResourceFetchError` are **recoverable** and never cross the public
//! API of the core as a `Result`: the pagination controller turns a failed page into
//! "retry eligible" (`should_load = true`) and the resource loader leaves the slot
//! unfilled. Invalid layout inputs are caller bugs and panic inside the layout engine.
//! Only `InputError` and the configuration/logging errors are fatal, and only in the
//! binary.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error of the `reviewfeed` binary.
///
/// All fatal domain errors convert into `AppError` via `From`, so `main` can use `?`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configured data source could not be opened.
    #[error("Failed to open data source: {0}")]
    Input(#[from] InputError),

    /// The configuration file exists but is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

/// Failure of a single page fetch.
///
/// Carried from a [`DataProvider`](crate::pagination::DataProvider) to the pagination
/// controller. Recovered locally by re-enabling loading; surfaced to users only as
/// "no new items appeared".
///
/// Reasons are kept as strings; no `reqwest` or `serde_json` state travels
/// through the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, worker I/O).
    #[error("Transport failure: {reason}")]
    Transport {
        /// Human-readable cause.
        reason: String,
    },

    /// The server answered with a non-success HTTP status.
    #[error("Unexpected HTTP status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The payload arrived but is not a valid page.
    ///
    /// # Examples
    ///
    /// ```
    /// use reviewfeed::model::error::FetchError;
    ///
    /// let err = FetchError::Decode { reason: "missing field `count`".to_string() };
    /// assert!(err.to_string().contains("count"));
    /// ```
    #[error("Malformed page payload: {reason}")]
    Decode {
        /// The decoder's message.
        reason: String,
    },

    /// The provider dropped its reply handle without answering.
    #[error("Provider abandoned the request without a response")]
    Abandoned,
}

/// Failure to load one binary resource by key.
///
/// Recovered by leaving the slot without an image (or with a caller-chosen
/// placeholder). The cache never retries on its own; binding the key again makes a
/// fresh attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceFetchError {
    /// The request for `key` failed before a response arrived.
    #[error("Failed to fetch {key}: {reason}")]
    Transport {
        /// The resource key (URL).
        key: String,
        /// Human-readable cause.
        reason: String,
    },

    /// The server answered with a non-success HTTP status.
    #[error("Fetching {key} returned HTTP status {status}")]
    Status {
        /// The resource key (URL).
        key: String,
        /// The HTTP status code.
        status: u16,
    },

    /// No background worker could be started for the fetch.
    #[error("No worker available to fetch {key}: {reason}")]
    WorkerUnavailable {
        /// The resource key (URL).
        key: String,
        /// Human-readable cause.
        reason: String,
    },
}

impl ResourceFetchError {
    /// The key whose fetch failed.
    pub fn key(&self) -> &str {
        match self {
            Self::Transport { key, .. }
            | Self::Status { key, .. }
            | Self::WorkerUnavailable { key, .. } => key,
        }
    }
}

/// Errors constructing a data source.
///
/// # Recovery Patterns
///
/// - **FileNotFound**: Display the path and exit; the user gave a bad argument
/// - **Decode**: Display the decoder message; the fixture is not a review page
/// - **Client**: The HTTP client could not be built (TLS backend, bad settings)
/// - **Io**: Anything else the OS reports
#[derive(Debug, Error)]
pub enum InputError {
    /// The fixture file does not exist.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use reviewfeed::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound { path: PathBuf::from("/tmp/missing.json") };
    /// assert!(err.to_string().contains("/tmp/missing.json"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// The fixture file exists but does not contain a review page.
    #[error("Invalid review data in {path}: {reason}")]
    Decode {
        /// The fixture path.
        path: PathBuf,
        /// The decoder's message.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {reason}")]
    Client {
        /// Human-readable cause.
        reason: String,
    },

    /// Generic I/O failure while reading the source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
