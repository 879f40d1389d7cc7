//! Domain model types (pure).
//!
//! Wire records, row view-models and the error taxonomy. Nothing in here
//! performs I/O.

pub mod error;
pub mod identifiers;
pub mod image;
pub mod rating;
pub mod review;
pub mod row;
pub mod styled_text;

// Re-export for convenience
pub use error::{AppError, FetchError, InputError, ResourceFetchError};
pub use identifiers::{RowId, SlotId};
pub use image::{ImageHandle, ImageSource};
pub use rating::{RatingConfig, RatingRenderer, MAX_RATING};
pub use review::{decode_page, RawItem, RawPage};
pub use row::RowViewModel;
pub use styled_text::{FontSpec, StyledText, TextStyle, Typography};
