//! Row layout (pure).
//!
//! Given a row view-model and a width, computes the frame of every sub-element
//! and the total row height. Text measurement is pluggable via
//! [`TextMeasurer`].

pub mod cache;
pub mod engine;
pub mod height_index;
pub mod heights;
pub mod metrics;
pub mod params;

pub use cache::{LayoutCache, LayoutCacheKey, DEFAULT_LAYOUT_CACHE_CAPACITY};
pub use engine::{LayoutEngine, LayoutResult, RowFrames};
pub use height_index::HeightIndex;
pub use heights::RowHeights;
pub use metrics::{MonospaceMeasurer, TextMeasurer};
pub use params::{LayoutParams, SHOW_MORE_LABEL};
