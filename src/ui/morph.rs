//! Rect animator for the card → detail morph.
//!
//! Works like [`SmoothScroll`](super::smooth_scroll::SmoothScroll) but on all
//! four edges at once: each tick the displayed rect covers a fixed fraction
//! of the remaining distance to its target.  The transition state machine
//! decides *where* the surface should be; this only decides how it gets
//! there.

use crate::core::geometry::Rect;

/// Below this many cells on every edge the morph counts as finished.
const SETTLE_EPSILON: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct MorphAnimator {
    current: Rect,
    target: Rect,
    speed: f64,
}

impl MorphAnimator {
    /// Start at rest on `at`.
    pub fn new(at: Rect, speed: f64) -> Self {
        Self {
            current: at,
            target: at,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// Aim at a new target without moving.
    pub fn retarget(&mut self, target: Rect) {
        self.target = target;
    }

    pub fn target(&self) -> Rect {
        self.target
    }

    pub fn current(&self) -> Rect {
        self.current
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.current = self.current.lerp(&self.target, self.speed);
        if self.current.max_edge_distance(&self.target) < SETTLE_EPSILON {
            self.current = self.target;
        }
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Progress from `from` to the target in `[0, 1]`, measured on the
    /// largest edge gap.
    pub fn progress_from(&self, from: &Rect) -> f64 {
        let total = from.max_edge_distance(&self.target);
        if total <= f64::EPSILON {
            return 1.0;
        }
        (1.0 - self.current.max_edge_distance(&self.target) / total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_exactly_on_target() {
        let card = Rect::new(2.0, 10.0, 40.0, 7.0);
        let full = Rect::new(0.0, 0.0, 80.0, 23.0);
        let mut m = MorphAnimator::new(card, 0.35);
        assert!(m.is_settled());

        m.retarget(full);
        assert!(!m.is_settled());
        m.tick();
        let p = m.progress_from(&card);
        assert!(p > 0.3 && p < 0.4, "{p}");

        for _ in 0..60 {
            m.tick();
        }
        assert!(m.is_settled());
        assert_eq!(m.current(), full);
        assert_eq!(m.progress_from(&card), 1.0);
    }

    #[test]
    fn retargeting_mid_flight_reverses() {
        let card = Rect::new(2.0, 10.0, 40.0, 7.0);
        let full = Rect::new(0.0, 0.0, 80.0, 23.0);
        let mut m = MorphAnimator::new(card, 0.5);
        m.retarget(full);
        m.tick();
        m.retarget(card);
        for _ in 0..60 {
            m.tick();
        }
        assert_eq!(m.current(), card);
    }
}
