//! Paginated review feed.
//!
//! [`PaginationController`] owns the list state and talks to a
//! [`DataProvider`]; [`RowMapper`] turns wire records into row view-models;
//! the renderer is told about changes through three notification channels.

pub mod controller;
pub mod footer;
pub mod http;
pub mod mapper;
pub mod notify;
pub mod prefetch;
pub mod provider;
pub mod state;

pub use controller::{PaginationController, DEFAULT_PAGE_LIMIT};
pub use footer::review_count_label;
pub use http::HttpProvider;
pub use mapper::{RowMapper, AVATAR_PLACEHOLDER, DEFAULT_COLLAPSED_LINES};
pub use notify::{Notifier, Subscription};
pub use prefetch::{should_prefetch, PrefetchPolicy, ScrollMetrics, DEFAULT_PREFETCH_SCREENS};
pub use provider::{DataProvider, JsonFileProvider, PageReply};
pub use state::{ListState, PageRequest};
