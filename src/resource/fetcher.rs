//! Resource fetch backends.

use crate::model::error::ResourceFetchError;
use reqwest::blocking::Client;
use std::time::Duration;

/// Blocking byte fetch by key. Called on a worker thread, never on the owner.
pub trait ResourceFetcher: Send + Sync + 'static {
    /// Fetch the bytes for `key`.
    fn fetch(&self, key: &str) -> Result<Vec<u8>, ResourceFetchError>;
}

/// Fetches resources over HTTP(S), treating the key as a URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Fetcher with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the client builder's error if TLS or settings are unusable.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, key: &str) -> Result<Vec<u8>, ResourceFetchError> {
        let transport = |e: reqwest::Error| ResourceFetchError::Transport {
            key: key.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(key).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResourceFetchError::Status {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().map_err(transport)?.to_vec())
    }
}
