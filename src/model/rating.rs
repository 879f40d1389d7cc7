//! Star rating rendering.
//!
//! Ratings are rendered once per star count and handed out as shared handles,
//! so mapping a page of reviews never re-renders the same rating.

use crate::geometry::Size;
use crate::model::image::{ImageHandle, ImageSource};
use tracing::warn;

/// Highest rating a review can carry.
pub const MAX_RATING: u8 = 5;

/// Geometry of the rendered star strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingConfig {
    /// Edge of one square star.
    pub star_size: f64,
    /// Gap between adjacent stars.
    pub spacing: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            star_size: 16.0,
            spacing: 1.0,
        }
    }
}

/// Produces rating images for 0 to [`MAX_RATING`] stars.
#[derive(Debug, Clone)]
pub struct RatingRenderer {
    images: Vec<ImageHandle>,
}

impl RatingRenderer {
    /// Pre-render every possible rating.
    pub fn new(config: RatingConfig) -> Self {
        let stars = f64::from(MAX_RATING);
        let size = Size::new(
            stars * config.star_size + (stars - 1.0) * config.spacing,
            config.star_size,
        );
        let images = (0..=MAX_RATING)
            .map(|rating| ImageHandle::new(ImageSource::Rating(rating), size))
            .collect();
        Self { images }
    }

    /// Image for `rating`. Values above [`MAX_RATING`] are clamped.
    pub fn rating_image(&self, rating: u8) -> ImageHandle {
        self.images[usize::from(Self::clamp(rating))].clone()
    }

    /// Textual form of the rating, e.g. `★★★☆☆`.
    pub fn glyphs(rating: u8) -> String {
        let filled = usize::from(Self::clamp(rating));
        let empty = usize::from(MAX_RATING) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }

    fn clamp(rating: u8) -> u8 {
        if rating > MAX_RATING {
            warn!(rating, max = MAX_RATING, "Rating out of range, clamping");
            MAX_RATING
        } else {
            rating
        }
    }
}

impl Default for RatingRenderer {
    fn default() -> Self {
        Self::new(RatingConfig::default())
    }
}
