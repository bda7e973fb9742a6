//! Plain geometry values shared by the transition and scroll primitives.
//!
//! Coordinates are `f64` in one global space (terminal cells for this app) so
//! animations can interpolate between frames without rounding drift.  The UI
//! layer converts to and from Ratatui's integer `Rect` at the edges.

/// A 2D point.  Also used as a scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle: origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rect of `size` whose center sits on `center`.
    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// All components finite and the size non-negative.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Linear interpolation towards `other` (`t = 0` → self, `t = 1` → other).
    pub fn lerp(&self, other: &Rect, t: f64) -> Rect {
        let t = t.clamp(0.0, 1.0);
        Rect {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            width: self.width + (other.width - self.width) * t,
            height: self.height + (other.height - self.height) * t,
        }
    }

    /// Largest per-edge distance to `other`, used to decide when a morph
    /// has visually settled.
    pub fn max_edge_distance(&self, other: &Rect) -> f64 {
        let left = (self.x - other.x).abs();
        let top = (self.y - other.y).abs();
        let right = ((self.x + self.width) - (other.x + other.width)).abs();
        let bottom = ((self.y + self.height) - (other.y + other.height)).abs();
        left.max(top).max(right).max(bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_size() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.center(), Point::new(60.0, 45.0));
        assert_eq!(r.size(), Size::new(100.0, 50.0));
        assert_eq!(Rect::from_center(r.center(), r.size()), r);
    }

    #[test]
    fn lerp_clamps_progress() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(a.lerp(&b, 0.5), Rect::new(5.0, 10.0, 20.0, 25.0));
        assert_eq!(a.lerp(&b, 2.0), b);
        assert_eq!(a.lerp(&b, -1.0), a);
    }

    #[test]
    fn degenerate_rects_are_not_well_formed() {
        assert!(Rect::new(0.0, 0.0, 0.0, 0.0).is_well_formed());
        assert!(!Rect::new(0.0, 0.0, -1.0, 4.0).is_well_formed());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 4.0).is_well_formed());
    }
}
