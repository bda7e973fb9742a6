//! Row-level smooth scroll with exponential ease-out.
//!
//! The logical scroll target jumps immediately; the rendered position chases
//! it, covering a fixed fraction of the remaining distance each tick, so the
//! content slides by a few terminal rows per frame with visible deceleration.

/// Row-offset smooth scroll animator.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Rendered position, in rows from the top of the content.
    position: f64,
    /// Where the position is heading.
    target: f64,
    /// Damping: `gap *= (1 - speed)` each tick.
    /// Higher speed = faster settle.  Good range: 0.25–0.45 at 30 fps.
    speed: f64,
}

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target.max(0.0);
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Jump straight to `target` with no animation.
    pub fn snap_to(&mut self, target: f64) {
        self.set_target(target);
        self.position = self.target;
    }

    /// Move the position toward the target.  Call once per frame.
    pub fn tick(&mut self) {
        self.position += (self.target - self.position) * self.speed;
        if (self.target - self.position).abs() < 0.4 {
            self.position = self.target;
        }
    }

    /// Current rendered offset (whole rows).
    pub fn row_offset(&self) -> u16 {
        self.position.round().clamp(0.0, f64::from(u16::MAX)) as u16
    }

    /// True while the position has not yet reached the target.
    pub fn is_animating(&self) -> bool {
        self.position != self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eases_out_and_settles() {
        let mut s = SmoothScroll::new(0.5);
        s.set_target(16.0);
        s.tick();
        assert_eq!(s.row_offset(), 8);
        s.tick();
        assert_eq!(s.row_offset(), 12);
        for _ in 0..20 {
            s.tick();
        }
        assert!(!s.is_animating());
        assert_eq!(s.row_offset(), 16);
    }

    #[test]
    fn never_targets_above_the_top() {
        let mut s = SmoothScroll::new(0.4);
        s.snap_to(-3.0);
        assert_eq!(s.target(), 0.0);
        assert!(!s.is_animating());
    }
}
