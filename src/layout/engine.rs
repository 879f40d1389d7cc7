//! Row geometry.
//!
//! [`LayoutEngine::compute`] is THE canonical height calculation for a review
//! row. Hosts use `total_height` for virtualized scrolling and the frames to
//! position sub-views.

use super::metrics::TextMeasurer;
use super::params::{LayoutParams, SHOW_MORE_LABEL};
use crate::geometry::{Point, Rect, Size};
use crate::model::{RowViewModel, StyledText, TextStyle};

/// Rectangles of every sub-element of a row, in row-local coordinates.
///
/// Optional frames are `None` when the element is not shown at all, so no gap
/// is reserved for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFrames {
    /// Avatar square.
    pub avatar: Rect,
    /// Author name.
    pub username: Rect,
    /// Rating image at its natural size.
    pub rating: Rect,
    /// Horizontal thumbnail strip; present only with at least one attachment.
    pub attachments: Option<Rect>,
    /// Review body; present only for non-empty text.
    pub text: Option<Rect>,
    /// Expand affordance; present only when collapsed text is truncated.
    pub show_more: Option<Rect>,
    /// Creation label.
    pub created: Rect,
}

/// Output of one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    /// Sub-element frames.
    pub frames: RowFrames,
    /// Height of the whole row including insets.
    pub total_height: f64,
}

impl LayoutResult {
    /// True when the row shows an expand control.
    pub fn needs_expand_control(&self) -> bool {
        self.frames.show_more.is_some()
    }
}

/// Computes row geometry from content, a width, and a measurement backend.
///
/// The engine holds no per-row state: `compute` is referentially transparent
/// for a given measurer.
#[derive(Debug, Clone)]
pub struct LayoutEngine<M> {
    measurer: M,
    params: LayoutParams,
    show_more_size: Size,
}

impl<M: TextMeasurer> LayoutEngine<M> {
    /// Create an engine. Measures the expand label once up front.
    pub fn new(measurer: M, params: LayoutParams) -> Self {
        let label = StyledText::new(SHOW_MORE_LABEL, TextStyle::ShowMore);
        let show_more_size = measurer.measure(&label, f64::INFINITY, None);
        Self {
            measurer,
            params,
            show_more_size,
        }
    }

    /// Fixed dimensions in use.
    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Measurement backend in use.
    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Natural size of the expand control.
    pub fn show_more_size(&self) -> Size {
        self.show_more_size
    }

    /// Lay out `row` within `max_width`.
    ///
    /// Top-down flow: avatar at the top-left inset, then a single content
    /// column right of it holding username, rating, optional photo strip,
    /// optional (possibly truncated) text, optional expand control and the
    /// created label.
    ///
    /// # Panics
    ///
    /// Panics if `max_width` is not a positive finite number. That is a caller
    /// bug, not a runtime condition.
    pub fn compute(&self, row: &RowViewModel, max_width: f64) -> LayoutResult {
        assert!(
            max_width.is_finite() && max_width > 0.0,
            "layout requires a positive, finite max_width (got {max_width})"
        );

        let p = &self.params;
        let content_x = p.content_x();
        let column_width = (max_width - p.insets.right - content_x).max(0.0);

        let avatar = Rect::new(Point::new(p.insets.left, p.insets.top), p.avatar_size);

        let username_height = self
            .measurer
            .measure(row.username(), column_width, None)
            .height;
        let username = Rect::from_xywh(content_x, p.insets.top, column_width, username_height);

        let rating = Rect::new(
            Point::new(content_x, username.max_y() + p.username_to_rating_spacing),
            row.rating_image().size(),
        );

        let mut cursor;
        let attachments = if row.has_attachments() {
            let strip = Rect::from_xywh(
                content_x,
                rating.max_y() + p.rating_to_photos_spacing,
                column_width,
                p.photo_size.height,
            );
            cursor = strip.max_y() + p.photos_to_text_spacing;
            Some(strip)
        } else {
            cursor = rating.max_y() + p.rating_to_text_spacing;
            None
        };

        let mut needs_expand_control = false;
        let text = if row.text().is_empty() {
            None
        } else {
            let collapsed_height = match row.max_visible_lines() {
                0 => None,
                lines => {
                    Some(self.measurer.line_height(row.text().style()) * lines as f64)
                }
            };
            let full_height = self.measurer.measure(row.text(), column_width, None).height;
            needs_expand_control = collapsed_height.is_some_and(|cap| full_height > cap);

            let size = self
                .measurer
                .measure(row.text(), column_width, collapsed_height);
            let frame = Rect::new(Point::new(content_x, cursor), size);
            cursor = frame.max_y() + p.text_to_created_spacing;
            Some(frame)
        };

        let show_more = if needs_expand_control {
            let frame = Rect::new(Point::new(content_x, cursor), self.show_more_size);
            cursor = frame.max_y() + p.show_more_to_created_spacing;
            Some(frame)
        } else {
            None
        };

        let created = Rect::new(
            Point::new(content_x, cursor),
            self.measurer.measure(row.created(), column_width, None),
        );

        LayoutResult {
            frames: RowFrames {
                avatar,
                username,
                rating,
                attachments,
                text,
                show_more,
                created,
            },
            total_height: created.max_y() + p.insets.bottom,
        }
    }

    /// Shorthand for `compute(row, max_width).total_height`.
    pub fn height(&self, row: &RowViewModel, max_width: f64) -> f64 {
        self.compute(row, max_width).total_height
    }

    /// Frames of `count` thumbnails laid out left to right inside `strip`.
    ///
    /// The strip scrolls horizontally, so trailing frames may extend past its
    /// right edge.
    pub fn thumbnail_frames(&self, strip: Rect, count: usize) -> Vec<Rect> {
        let step = self.params.photo_size.width + self.params.photos_spacing;
        (0..count)
            .map(|i| {
                Rect::new(
                    Point::new(strip.min_x() + step * i as f64, strip.min_y()),
                    self.params.photo_size,
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
