//! Renderer-ready row view-model.

use crate::model::identifiers::RowId;
use crate::model::image::ImageHandle;
use crate::model::styled_text::StyledText;

/// One review as the renderer sees it.
///
/// Immutable except for the line limit, which only the pagination controller
/// changes (the expand mutation). `max_visible_lines == 0` means unlimited.
#[derive(Debug, Clone, PartialEq)]
pub struct RowViewModel {
    id: RowId,
    username: StyledText,
    text: StyledText,
    max_visible_lines: usize,
    created: StyledText,
    avatar: ImageHandle,
    rating_image: ImageHandle,
    attachment_urls: Option<Vec<String>>,
}

impl RowViewModel {
    /// Create a row with a fresh id, no attachments and no line limit.
    pub fn new(
        username: StyledText,
        text: StyledText,
        created: StyledText,
        avatar: ImageHandle,
        rating_image: ImageHandle,
    ) -> Self {
        Self {
            id: RowId::new(),
            username,
            text,
            max_visible_lines: 0,
            created,
            avatar,
            rating_image,
            attachment_urls: None,
        }
    }

    /// Set the attachment URLs.
    pub fn with_attachments(mut self, urls: Option<Vec<String>>) -> Self {
        self.attachment_urls = urls;
        self
    }

    /// Set the collapsed line limit (0 = unlimited).
    pub fn with_max_visible_lines(mut self, lines: usize) -> Self {
        self.max_visible_lines = lines;
        self
    }

    /// Stable identifier.
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Author name.
    pub fn username(&self) -> &StyledText {
        &self.username
    }

    /// Review body.
    pub fn text(&self) -> &StyledText {
        &self.text
    }

    /// Line limit for the body; 0 means unlimited.
    pub fn max_visible_lines(&self) -> usize {
        self.max_visible_lines
    }

    /// True once the body shows without a line limit.
    pub fn is_expanded(&self) -> bool {
        self.max_visible_lines == 0
    }

    /// Creation label.
    pub fn created(&self) -> &StyledText {
        &self.created
    }

    /// Avatar image.
    pub fn avatar(&self) -> &ImageHandle {
        &self.avatar
    }

    /// Rating image.
    pub fn rating_image(&self) -> &ImageHandle {
        &self.rating_image
    }

    /// Attachment URLs exactly as received; `None` when the item had none.
    pub fn attachment_urls(&self) -> Option<&[String]> {
        self.attachment_urls.as_deref()
    }

    /// True when there is at least one attachment to preview.
    pub fn has_attachments(&self) -> bool {
        self.attachment_urls.as_ref().is_some_and(|urls| !urls.is_empty())
    }

    pub(crate) fn expand(&mut self) {
        self.max_visible_lines = 0;
    }
}
