//! Scroll-driven prefetch predicate.

/// Screens of content left below the viewport at which the next page is requested.
pub const DEFAULT_PREFETCH_SCREENS: f64 = 2.5;

/// True when the remaining content below the target scroll position is within
/// `threshold_screens` viewports.
///
/// A list no taller than its viewport always qualifies.
///
/// ```
/// use reviewfeed::pagination::should_prefetch;
///
/// // 3000 - 800 - 1700 = 500 <= 800 * 2.5
/// assert!(should_prefetch(800.0, 3000.0, 1700.0, 2.5));
/// assert!(!should_prefetch(800.0, 10_000.0, 0.0, 2.5));
/// ```
pub fn should_prefetch(
    viewport_height: f64,
    content_height: f64,
    target_scroll_offset: f64,
    threshold_screens: f64,
) -> bool {
    content_height - viewport_height - target_scroll_offset
        <= viewport_height * threshold_screens
}

/// Geometry reported by the host when a scroll gesture is about to end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Visible height of the list.
    pub viewport_height: f64,
    /// Height of all rows.
    pub content_height: f64,
    /// Offset the scroll will come to rest at.
    pub target_offset: f64,
}

/// Prefetch threshold, in screens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefetchPolicy {
    /// Screens of remaining content that trigger a load.
    pub threshold_screens: f64,
}

impl PrefetchPolicy {
    /// Policy with the given threshold.
    pub fn new(threshold_screens: f64) -> Self {
        Self { threshold_screens }
    }

    /// Apply [`should_prefetch`] with this policy's threshold.
    pub fn should_prefetch(&self, metrics: ScrollMetrics) -> bool {
        should_prefetch(
            metrics.viewport_height,
            metrics.content_height,
            metrics.target_offset,
            self.threshold_screens,
        )
    }
}

impl Default for PrefetchPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PREFETCH_SCREENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn near_end_triggers() {
        assert!(should_prefetch(800.0, 3000.0, 1700.0, 2.5));
    }

    #[test]
    fn far_from_end_does_not_trigger() {
        assert!(!should_prefetch(800.0, 3000.0, 0.0, 2.5));
    }

    #[test]
    fn boundary_is_inclusive() {
        // 3000 - 800 - 200 = 2000 == 800 * 2.5
        assert!(should_prefetch(800.0, 3000.0, 200.0, 2.5));
    }

    #[test]
    fn short_list_always_triggers() {
        assert!(should_prefetch(800.0, 300.0, 0.0, 2.5));
        assert!(should_prefetch(800.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn policy_uses_its_threshold() {
        let metrics = ScrollMetrics {
            viewport_height: 800.0,
            content_height: 3000.0,
            target_offset: 1700.0,
        };
        assert!(PrefetchPolicy::default().should_prefetch(metrics));
        assert!(!PrefetchPolicy::new(0.5).should_prefetch(metrics));
    }

    proptest! {
        #[test]
        fn content_within_viewport_always_prefetches(
            viewport in 1.0f64..2000.0,
            fraction in 0.0f64..=1.0,
            threshold in 0.0f64..5.0,
        ) {
            prop_assert!(should_prefetch(viewport, viewport * fraction, 0.0, threshold));
        }

        #[test]
        fn scrolling_further_never_cancels_prefetch(
            viewport in 1.0f64..2000.0,
            content in 0.0f64..50_000.0,
            offset in 0.0f64..50_000.0,
            extra in 0.0f64..10_000.0,
        ) {
            if should_prefetch(viewport, content, offset, 2.5) {
                prop_assert!(should_prefetch(viewport, content, offset + extra, 2.5));
            }
        }
    }
}
