//! Wire record to row view-model mapping.

use crate::geometry::Size;
use crate::model::{
    ImageHandle, ImageSource, RatingRenderer, RawItem, RowViewModel, StyledText, TextStyle,
};

/// Asset name of the bundled avatar placeholder.
pub const AVATAR_PLACEHOLDER: &str = "avatar-placeholder";

/// Lines a review body shows before it is expanded.
pub const DEFAULT_COLLAPSED_LINES: usize = 3;

/// Turns [`RawItem`]s into [`RowViewModel`]s.
#[derive(Debug, Clone)]
pub struct RowMapper {
    ratings: RatingRenderer,
    avatar_size: Size,
    collapsed_lines: usize,
}

impl RowMapper {
    /// Mapper that collapses bodies to `collapsed_lines` (0 = never collapse).
    pub fn new(ratings: RatingRenderer, avatar_size: Size, collapsed_lines: usize) -> Self {
        Self {
            ratings,
            avatar_size,
            collapsed_lines,
        }
    }

    /// Map one item. Every call mints a fresh row id.
    pub fn map(&self, item: &RawItem) -> RowViewModel {
        let username = format!("{} {}", item.first_name, item.last_name);
        let avatar_source = match &item.avatar_url {
            Some(url) => ImageSource::Remote(url.clone()),
            None => ImageSource::Asset(AVATAR_PLACEHOLDER.to_string()),
        };

        RowViewModel::new(
            StyledText::new(username, TextStyle::Username),
            StyledText::new(item.text.clone(), TextStyle::Body),
            StyledText::new(item.created.clone(), TextStyle::Created),
            ImageHandle::new(avatar_source, self.avatar_size),
            self.ratings.rating_image(item.rating),
        )
        .with_max_visible_lines(self.collapsed_lines)
        .with_attachments(item.photo_urls.clone())
    }
}

impl Default for RowMapper {
    fn default() -> Self {
        Self::new(
            RatingRenderer::default(),
            Size::new(36.0, 36.0),
            DEFAULT_COLLAPSED_LINES,
        )
    }
}
