//! Scroll-offset tracking.
//!
//! A [`ScrollOffsetTracker`] republishes how far a scrollable region's
//! content has moved from its resting position.  Hosts feed it one of two
//! ways:
//!
//! * **Layout passes** — open a [`LayoutPass`], report where the zero-height
//!   probe at the top of the content ended up relative to the container
//!   origin, then commit.  Several reports in one pass are merged in order
//!   and the first one wins; nothing is published until the pass commits, so
//!   consumers never observe a half-finished layout.
//! * **Direct events** — [`ScrollOffsetTracker::set_offset`] for hosts that
//!   already know the scroll position.
//!
//! Consumers either poll [`ScrollOffsetTracker::current_offset`] or hold a
//! `watch::Receiver` from [`ScrollOffsetTracker::subscribe`].

use tokio::sync::watch;

use super::geometry::Point;

/// Content displacement; positive = scrolled down / right.
pub type ScrollOffset = Point;

/// Ordered accumulation of probe reports within one layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetReports(Vec<ScrollOffset>);

impl OffsetReports {
    /// Merge step: later reports are appended behind earlier ones.
    pub fn merge(&mut self, next: impl IntoIterator<Item = ScrollOffset>) {
        self.0.extend(next);
    }

    /// The entry a committed pass resolves to.
    pub fn resolved(&self) -> Option<ScrollOffset> {
        self.0.first().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Offset implied by a probe at `probe_origin`, measured against the
/// scroll container's unscrolled origin.  Content scrolled down sits above
/// the container origin, so the delta is negated.
pub fn probe_offset(probe_origin: Point, container_origin: Point) -> ScrollOffset {
    ScrollOffset::new(
        -(probe_origin.x - container_origin.x),
        -(probe_origin.y - container_origin.y),
    )
}

#[derive(Debug)]
pub struct ScrollOffsetTracker {
    tx: watch::Sender<ScrollOffset>,
}

impl Default for ScrollOffsetTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollOffsetTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ScrollOffset::ZERO);
        Self { tx }
    }

    /// Most recently published offset; `(0, 0)` before any content reported.
    pub fn current_offset(&self) -> ScrollOffset {
        *self.tx.borrow()
    }

    /// A receiver that observes every published change.
    pub fn subscribe(&self) -> watch::Receiver<ScrollOffset> {
        self.tx.subscribe()
    }

    /// Publish an offset reported directly by the host.
    pub fn set_offset(&self, offset: ScrollOffset) {
        self.publish(offset);
    }

    /// Start collecting probe reports for one layout pass.
    pub fn begin_pass(&self) -> LayoutPass<'_> {
        LayoutPass {
            tracker: self,
            reports: OffsetReports::default(),
        }
    }

    fn publish(&self, offset: ScrollOffset) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == offset {
                false
            } else {
                *current = offset;
                true
            }
        });
        if changed {
            tracing::trace!(x = offset.x, y = offset.y, "scroll offset");
        }
    }
}

/// Probe reports gathered during a single layout pass.
#[must_use = "a layout pass publishes nothing until committed"]
pub struct LayoutPass<'a> {
    tracker: &'a ScrollOffsetTracker,
    reports: OffsetReports,
}

impl LayoutPass<'_> {
    pub fn report_probe(&mut self, probe_origin: Point, container_origin: Point) {
        self.reports
            .merge([probe_offset(probe_origin, container_origin)]);
    }

    pub fn reports(&self) -> &OffsetReports {
        &self.reports
    }

    /// Publish the resolved offset.  A pass with no reports leaves the
    /// previous offset in place.  Returns the current offset afterwards.
    pub fn commit(self) -> ScrollOffset {
        if let Some(offset) = self.reports.resolved() {
            self.tracker.publish(offset);
        }
        self.tracker.current_offset()
    }
}
