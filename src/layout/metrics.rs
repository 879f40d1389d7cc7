//! Text measurement.
//!
//! The layout engine never measures text itself; it asks a [`TextMeasurer`].
//! Hosts plug in their toolkit's text system. [`MonospaceMeasurer`] is a
//! deterministic backend on fixed glyph advances, used by the headless binary
//! and by tests.

use crate::geometry::Size;
use crate::model::{StyledText, TextStyle, Typography};
use unicode_width::UnicodeWidthStr;

/// Text-measurement capability consumed by the layout engine.
///
/// # Contract
/// - MUST be deterministic: the same inputs always produce the same output
/// - `measure` wraps at `max_width` and, when `max_height` is given, keeps only
///   the whole lines that fit within it
/// - Empty text measures as [`Size::ZERO`]
pub trait TextMeasurer {
    /// Bounding size of `text` wrapped to `max_width`, optionally capped at `max_height`.
    fn measure(&self, text: &StyledText, max_width: f64, max_height: Option<f64>) -> Size;

    /// Baseline-to-baseline distance of the font used for `style`.
    fn line_height(&self, style: TextStyle) -> f64;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &StyledText, max_width: f64, max_height: Option<f64>) -> Size {
        (**self).measure(text, max_width, max_height)
    }

    fn line_height(&self, style: TextStyle) -> f64 {
        (**self).line_height(style)
    }
}

/// Fixed-advance measurer: every terminal column costs one glyph advance.
///
/// Wraps greedily on whitespace, hard-breaks words wider than a line, and
/// treats `\n` as a paragraph break. Column widths come from `unicode-width`,
/// so wide (CJK) glyphs take two advances.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasurer {
    typography: Typography,
}

impl MonospaceMeasurer {
    /// Create a measurer over the given fonts.
    pub fn new(typography: Typography) -> Self {
        Self { typography }
    }

    /// Number of lines `text` wraps to at `max_width`, without any height cap.
    pub fn line_count(&self, text: &StyledText, max_width: f64) -> usize {
        self.wrap(text, max_width).len()
    }

    fn wrap(&self, text: &StyledText, max_width: f64) -> Vec<usize> {
        if text.is_empty() {
            return Vec::new();
        }
        let advance = self.typography.font(text.style()).glyph_advance;
        // Float-to-int casts saturate, so an unbounded width yields usize::MAX columns.
        let columns = ((max_width / advance).floor() as usize).max(1);

        text.as_str()
            .split('\n')
            .flat_map(|paragraph| wrap_paragraph(paragraph, columns))
            .collect()
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &StyledText, max_width: f64, max_height: Option<f64>) -> Size {
        let mut lines = self.wrap(text, max_width);
        let font = self.typography.font(text.style());

        if let Some(cap) = max_height {
            let fitting = (cap / font.line_height + 1e-9).floor().max(0.0) as usize;
            lines.truncate(fitting);
        }

        let widest = lines.iter().copied().max().unwrap_or(0);
        Size::new(
            (widest as f64 * font.glyph_advance).min(max_width),
            lines.len() as f64 * font.line_height,
        )
    }

    fn line_height(&self, style: TextStyle) -> f64 {
        self.typography.font(style).line_height
    }
}

/// Greedy word wrap of one paragraph; returns the column width of each line.
fn wrap_paragraph(paragraph: &str, columns: usize) -> Vec<usize> {
    let mut lines = Vec::new();
    let mut current = 0usize;

    for word in paragraph.split_whitespace() {
        let mut width = word.width();
        if current > 0 && current + 1 + width <= columns {
            current += 1 + width;
            continue;
        }
        if current > 0 {
            lines.push(current);
        }
        while width > columns {
            lines.push(columns);
            width -= columns;
        }
        current = width;
    }

    // Blank paragraphs still occupy a line.
    if current > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
