//! Layout helpers — split the terminal area into regions and convert
//! between Ratatui cells and core geometry.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::core::geometry;

/// Primary screen layout: screen body and a bottom status bar.
pub struct AppLayout {
    pub body_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // screen body (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            body_area: chunks[0],
            status_area: chunks[1],
        }
    }
}

/// Cell rect → core rect.
pub fn to_geometry(r: Rect) -> geometry::Rect {
    geometry::Rect::new(
        f64::from(r.x),
        f64::from(r.y),
        f64::from(r.width),
        f64::from(r.height),
    )
}

/// Core rect → cell rect, rounded to whole cells and clipped to `clip`.
pub fn to_cells(r: &geometry::Rect, clip: Rect) -> Rect {
    let left = r.x.round();
    let top = r.y.round();
    let right = (r.x + r.width).round();
    let bottom = (r.y + r.height).round();

    let cl = f64::from(clip.x);
    let ct = f64::from(clip.y);
    let cr = f64::from(clip.x) + f64::from(clip.width);
    let cb = f64::from(clip.y) + f64::from(clip.height);

    let x0 = left.clamp(cl, cr);
    let y0 = top.clamp(ct, cb);
    let x1 = right.clamp(x0, cr);
    let y1 = bottom.clamp(y0, cb);

    Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16)
}

pub fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_round_trip() {
        let r = Rect::new(3, 4, 20, 10);
        assert_eq!(to_cells(&to_geometry(r), Rect::new(0, 0, 80, 24)), r);
    }

    #[test]
    fn cells_are_clipped() {
        let clip = Rect::new(0, 2, 40, 10);
        let r = geometry::Rect::new(-5.0, 0.0, 20.0, 50.0);
        assert_eq!(to_cells(&r, clip), Rect::new(0, 2, 15, 10));

        let outside = geometry::Rect::new(100.0, 100.0, 5.0, 5.0);
        assert_eq!(to_cells(&outside, clip).area(), 0);
    }
}
