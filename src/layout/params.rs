//! Fixed dimensions of a review row.

use crate::geometry::{EdgeInsets, Size};

/// Label of the expand affordance.
pub const SHOW_MORE_LABEL: &str = "Show more...";

/// Every fixed size and spacing the row layout uses.
///
/// Text sizes are not here; they come from the measurement backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Insets from the row edges to its content.
    pub insets: EdgeInsets,
    /// Avatar square.
    pub avatar_size: Size,
    /// Corner radius the host should clip the avatar with.
    pub avatar_corner_radius: f64,
    /// One attachment thumbnail.
    pub photo_size: Size,
    /// Corner radius the host should clip thumbnails with.
    pub photo_corner_radius: f64,
    /// Horizontal gap between thumbnails in the strip.
    pub photos_spacing: f64,
    /// Horizontal gap from the avatar to the content column.
    pub avatar_to_username_spacing: f64,
    /// Vertical gap from the username to the rating.
    pub username_to_rating_spacing: f64,
    /// Vertical gap from the rating to the text when there are no photos.
    pub rating_to_text_spacing: f64,
    /// Vertical gap from the rating to the photo strip.
    pub rating_to_photos_spacing: f64,
    /// Vertical gap from the photo strip to the text.
    pub photos_to_text_spacing: f64,
    /// Vertical gap below the text (to the expand control or the created label).
    pub text_to_created_spacing: f64,
    /// Vertical gap from the expand control to the created label.
    pub show_more_to_created_spacing: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            insets: EdgeInsets::new(9.0, 12.0, 9.0, 12.0),
            avatar_size: Size::new(36.0, 36.0),
            avatar_corner_radius: 18.0,
            photo_size: Size::new(55.0, 66.0),
            photo_corner_radius: 8.0,
            photos_spacing: 8.0,
            avatar_to_username_spacing: 10.0,
            username_to_rating_spacing: 6.0,
            rating_to_text_spacing: 6.0,
            rating_to_photos_spacing: 10.0,
            photos_to_text_spacing: 10.0,
            text_to_created_spacing: 6.0,
            show_more_to_created_spacing: 6.0,
        }
    }
}

impl LayoutParams {
    /// X coordinate of the content column (right of the avatar).
    pub fn content_x(&self) -> f64 {
        self.insets.left + self.avatar_size.width + self.avatar_to_username_spacing
    }
}
