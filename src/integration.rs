//! Headless feed simulation.
//!
//! Drives a [`PaginationController`] the way a list widget would: load the
//! first page, lay the rows out, scroll to the end, prefetch, repeat. Used by
//! the binary and by end-to-end tests; no terminal or window involved.

use crate::geometry::Size;
use crate::layout::{LayoutEngine, RowHeights, TextMeasurer};
use crate::model::{ImageSource, RatingRenderer, RowViewModel, SlotId};
use crate::pagination::{review_count_label, DataProvider, PaginationController, ScrollMetrics};
use crate::resource::{BindOutcome, ResourceFetcher, ResourceLoader, SlotUpdate};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Knobs for [`simulate_feed`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// Visible area of the list.
    pub viewport: Size,
    /// Row indices to expand once loading stops.
    pub expand: Vec<usize>,
    /// Longest wait for a single page.
    pub page_timeout: Duration,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            viewport: Size::new(375.0, 812.0),
            expand: Vec::new(),
            page_timeout: Duration::from_secs(30),
        }
    }
}

/// One laid-out row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowReport {
    /// Position in the list.
    pub index: usize,
    /// Top edge in content coordinates.
    pub offset: f64,
    /// Row height.
    pub height: f64,
    /// Filled stars.
    pub rating: u8,
    /// Author name.
    pub username: String,
    /// Number of attached photos.
    pub attachments: usize,
    /// The body is truncated and shows an expand control.
    pub truncated: bool,
    /// The body shows without a line limit.
    pub expanded: bool,
}

impl fmt::Display for RowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<3} y={:<7} h={:<4} {} {}",
            self.index,
            self.offset,
            self.height,
            RatingRenderer::glyphs(self.rating),
            self.username
        )?;
        if self.attachments > 0 {
            write!(f, " [{} photos]", self.attachments)?;
        }
        if self.truncated {
            write!(f, " [more]")?;
        } else if self.expanded {
            write!(f, " [expanded]")?;
        }
        Ok(())
    }
}

/// Outcome of a simulated session.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedReport {
    /// Every row, in list order.
    pub rows: Vec<RowReport>,
    /// Sum of row heights.
    pub content_height: f64,
    /// Completions applied.
    pub pages: usize,
    /// Footer label after the last page.
    pub footer: String,
    /// Every page has been consumed.
    pub exhausted: bool,
}

impl fmt::Display for FeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        write!(f, "-- {} (content height {})", self.footer, self.content_height)
    }
}

/// Load pages until the provider is exhausted, fails, or stops answering.
///
/// After every page the rows are laid out at the viewport width and the view
/// "scrolls" to the bottom; the next page is requested when the prefetch
/// predicate holds. A page that adds no rows ends the session, so a failing
/// provider is tried once rather than forever.
pub fn simulate_feed<P, M>(
    controller: &mut PaginationController<P>,
    engine: &LayoutEngine<M>,
    heights: &mut RowHeights,
    options: &SimulationOptions,
) -> FeedReport
where
    P: DataProvider,
    M: TextMeasurer,
{
    let width = options.viewport.width;
    let viewport_height = options.viewport.height;
    let mut pages = 0;

    controller.load();
    while controller.is_loading() {
        let before = controller.state().len();
        if !controller.wait_for_completion(options.page_timeout) {
            warn!(timeout = ?options.page_timeout, "Provider did not answer, stopping");
            break;
        }
        pages += 1;

        let rows = controller.state().items();
        heights.sync(rows, engine, width);
        if rows.len() == before {
            debug!(rows = before, "Page added no rows, stopping");
            break;
        }

        let content_height = heights.content_height();
        let metrics = ScrollMetrics {
            viewport_height,
            content_height,
            target_offset: (content_height - viewport_height).max(0.0),
        };
        if !controller.on_scroll_will_end(metrics) {
            break;
        }
    }

    for &index in &options.expand {
        match controller.state().items().get(index).map(RowViewModel::id) {
            Some(id) => {
                controller.request_expand(id);
            }
            None => warn!(index, "No row to expand"),
        }
    }
    heights.sync(controller.state().items(), engine, width);

    let rows: Vec<RowReport> = controller
        .state()
        .items()
        .iter()
        .enumerate()
        .map(|(index, row)| row_report(index, row, engine, heights, width))
        .collect();

    info!(
        rows = rows.len(),
        pages,
        content_height = heights.content_height(),
        "Simulation finished"
    );

    FeedReport {
        content_height: heights.content_height(),
        pages,
        footer: review_count_label(rows.len()),
        exhausted: controller.state().is_exhausted(),
        rows,
    }
}

fn row_report<M: TextMeasurer>(
    index: usize,
    row: &RowViewModel,
    engine: &LayoutEngine<M>,
    heights: &RowHeights,
    width: f64,
) -> RowReport {
    let layout = engine.compute(row, width);
    let rating = match row.rating_image().source() {
        ImageSource::Rating(stars) => *stars,
        _ => 0,
    };
    RowReport {
        index,
        offset: heights.row_offset(index),
        height: layout.total_height,
        rating,
        username: row.username().as_str().to_string(),
        attachments: row.attachment_urls().map_or(0, <[String]>::len),
        truncated: layout.needs_expand_control(),
        expanded: row.is_expanded(),
    }
}

/// Tally of [`load_row_images`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageSummary {
    /// Remote images bound to a slot.
    pub requested: usize,
    /// Served straight from the cache.
    pub cached: usize,
    /// Fetched and delivered.
    pub loaded: usize,
    /// Fetch failed.
    pub failed: usize,
}

/// Bind every remote avatar and attachment of `rows` to its own slot and wait
/// for the fetches.
pub fn load_row_images<F: ResourceFetcher>(
    loader: &mut ResourceLoader<F>,
    rows: &[RowViewModel],
    timeout: Duration,
) -> ImageSummary {
    let mut summary = ImageSummary::default();
    let keys = rows.iter().flat_map(|row| {
        row.avatar()
            .remote_key()
            .into_iter()
            .chain(row.attachment_urls().unwrap_or_default().iter().map(String::as_str))
    });

    for (n, key) in keys.enumerate() {
        summary.requested += 1;
        if let BindOutcome::Ready(_) = loader.bind(SlotId::new(n as u64), key) {
            summary.cached += 1;
        }
    }

    while loader.in_flight() > 0 {
        let updates = loader.wait(timeout);
        if updates.is_empty() && loader.in_flight() > 0 {
            warn!(in_flight = loader.in_flight(), "Image fetches timed out");
            break;
        }
        for update in updates {
            match update {
                SlotUpdate::Loaded { .. } => summary.loaded += 1,
                SlotUpdate::Failed { .. } => summary.failed += 1,
            }
        }
    }
    summary
}
