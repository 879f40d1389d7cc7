//! Wire records produced by data providers.
//!
//! A page on the wire looks like:
//!
//! ```json
//! {
//!   "items": [
//!     {
//!       "first_name": "Anna",
//!       "last_name": "Ivanova",
//!       "rating": 4,
//!       "text": "Great fit, fast delivery.",
//!       "created": "13 February",
//!       "photo_urls": ["https://cdn.example/1.jpg"]
//!     }
//!   ],
//!   "count": 45
//! }
//! ```

use crate::model::error::FetchError;
use serde::Deserialize;

/// One review as delivered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawItem {
    /// Author's first name.
    pub first_name: String,
    /// Author's last name.
    pub last_name: String,
    /// Star rating, expected 0 to 5.
    pub rating: u8,
    /// Free review text; may be empty.
    #[serde(default)]
    pub text: String,
    /// Pre-formatted creation label.
    pub created: String,
    /// Attached photo URLs. Absent and empty are both "no attachments".
    #[serde(default)]
    pub photo_urls: Option<Vec<String>>,
    /// Remote avatar, if the author has one.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// One page of reviews plus the server-side total.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPage {
    /// Items in server order.
    pub items: Vec<RawItem>,
    /// Total number of items across all pages.
    #[serde(rename = "count", alias = "total_count")]
    pub total_count: usize,
}

/// Decode a page payload.
///
/// # Errors
///
/// Returns `FetchError::Decode` with the decoder message if `bytes` is not a page.
pub fn decode_page(bytes: &[u8]) -> Result<RawPage, FetchError> {
    serde_json::from_slice(bytes).map_err(|e| FetchError::Decode {
        reason: e.to_string(),
    })
}
