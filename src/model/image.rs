//! Image handles carried by row view-models.

use crate::geometry::Size;

/// Where an image's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// A bundled asset, looked up by name by the host.
    Asset(String),
    /// A pre-rendered star rating with the given number of filled stars.
    Rating(u8),
    /// A remote image, resolved through the resource cache by URL.
    Remote(String),
}

/// Reference to an image together with its natural (unscaled) size.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    source: ImageSource,
    size: Size,
}

impl ImageHandle {
    /// Create a handle.
    pub fn new(source: ImageSource, size: Size) -> Self {
        Self { source, size }
    }

    /// Pixel source.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Natural size used by layout.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The resource cache key, for remote images only.
    pub fn remote_key(&self) -> Option<&str> {
        match &self.source {
            ImageSource::Remote(url) => Some(url),
            _ => None,
        }
    }
}
