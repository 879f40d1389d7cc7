//! HTTP page provider.

use super::provider::{DataProvider, PageReply};
use super::state::PageRequest;
use crate::model::error::{FetchError, InputError};
use crate::model::{decode_page, RawPage};
use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches pages with `GET <endpoint>?offset=<offset>&limit=<limit>`.
///
/// Each request runs on its own worker thread with a blocking client.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    endpoint: String,
}

impl HttpProvider {
    /// Provider for `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Client` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, InputError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InputError::Client {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint pages are requested from.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn fetch(client: &Client, endpoint: &str, request: PageRequest) -> Result<RawPage, FetchError> {
    let response = client
        .get(endpoint)
        .query(&[("offset", request.offset), ("limit", request.limit)])
        .send()
        .map_err(|e| FetchError::Transport {
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().map_err(|e| FetchError::Transport {
        reason: e.to_string(),
    })?;
    decode_page(&bytes)
}

impl DataProvider for HttpProvider {
    fn fetch_page(&self, request: PageRequest, reply: PageReply) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        debug!(endpoint = %endpoint, offset = request.offset, limit = request.limit, "GET page");

        let spawned = thread::Builder::new()
            .name("reviewfeed-http".to_string())
            .spawn(move || {
                reply.send(fetch(&client, &endpoint, request));
            });
        if let Err(e) = spawned {
            warn!(error = %e, "Failed to spawn page worker");
        }
    }
}
