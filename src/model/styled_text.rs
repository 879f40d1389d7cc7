//! Styled text and font metrics.
//!
//! Text carries a semantic [`TextStyle`] rather than a concrete font. A
//! [`Typography`] maps styles to [`FontSpec`]s; measurement backends read it.

/// Semantic role of a run of text within a review row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    /// Author name.
    Username,
    /// Review body.
    Body,
    /// Creation date label.
    Created,
    /// The "show more" affordance label.
    ShowMore,
}

/// Text plus the style it is rendered in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyledText {
    content: String,
    style: TextStyle,
}

impl StyledText {
    /// Create styled text.
    pub fn new(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    /// The raw text.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// The style this text is rendered in.
    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// True when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Metrics of a font as far as layout is concerned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Nominal point size.
    pub point_size: f64,
    /// Distance between consecutive baselines.
    pub line_height: f64,
    /// Advance of one narrow (single-column) glyph.
    pub glyph_advance: f64,
}

impl FontSpec {
    /// Build a spec from a point size using the usual 1.2 leading and 0.5 em glyph.
    pub fn from_point_size(point_size: f64) -> Self {
        Self {
            point_size,
            line_height: (point_size * 1.2).round(),
            glyph_advance: point_size * 0.5,
        }
    }
}

/// Font assignment for every [`TextStyle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    /// Font for author names.
    pub username: FontSpec,
    /// Font for review bodies.
    pub body: FontSpec,
    /// Font for creation labels.
    pub created: FontSpec,
    /// Font for the "show more" affordance.
    pub show_more: FontSpec,
}

impl Typography {
    /// Font for `style`.
    pub fn font(&self, style: TextStyle) -> FontSpec {
        match style {
            TextStyle::Username => self.username,
            TextStyle::Body => self.body,
            TextStyle::Created => self.created,
            TextStyle::ShowMore => self.show_more,
        }
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            username: FontSpec::from_point_size(17.0),
            body: FontSpec::from_point_size(16.0),
            created: FontSpec::from_point_size(14.0),
            show_more: FontSpec::from_point_size(16.0),
        }
    }
}
