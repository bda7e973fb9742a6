//! The "Today" screen — a date line, a title, and a list of tall cards that
//! morph into a full-screen detail surface when opened.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, StatefulWidget, Widget, Wrap},
};

use crate::core::{
    catalog::TodayCard,
    geometry,
    transition::{DetailGeometry, Phase, TransitionController},
};

use super::layout::{to_cells, to_geometry};
use super::morph::MorphAnimator;
use super::theme::Theme;

/// Rows a card occupies on screen (border included).
pub const CARD_HEIGHT: u16 = 7;
/// Vertical distance between the tops of consecutive cards.
pub const CARD_PITCH: u16 = CARD_HEIGHT + 1;
/// Columns of padding on each side of the card list.
const SIDE_PADDING: u16 = 2;
/// Date line + title + blank.
const HEADER_ROWS: u16 = 3;

// ───────────────────────────────────────── state ─────────────

/// Everything the Today screen owns between frames.
#[derive(Debug, Default)]
pub struct TodayState {
    /// Highlighted card index.
    pub selected: usize,
    /// Rows of the card list scrolled past.
    pub scroll: usize,
    pub transition: TransitionController,
    /// Mounted while the transition is not idle.
    pub detail: Option<DetailSurface>,
}

impl TodayState {
    pub fn select_next(&mut self, count: usize) {
        if count > 0 && self.selected < count - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Ensure the selected card is fully visible in a list of `height` rows.
    pub fn clamp_scroll(&mut self, height: u16) {
        if height == 0 {
            return;
        }
        let height = usize::from(height);
        let top = card_top(self.selected);
        let bottom = top.saturating_add(usize::from(CARD_HEIGHT));
        if top < self.scroll {
            self.scroll = top;
        } else if bottom > self.scroll.saturating_add(height) {
            self.scroll = bottom - height;
        }
    }
}

/// Content row of card `index`'s top edge.
fn card_top(index: usize) -> usize {
    index.saturating_mul(usize::from(CARD_PITCH))
}

/// Indices of the cards that can intersect a list of `height` rows.
fn visible_cards(scroll: usize, height: u16, count: usize) -> std::ops::Range<usize> {
    let pitch = usize::from(CARD_PITCH);
    let first = scroll / pitch;
    let last = scroll.saturating_add(usize::from(height)) / pitch + 1;
    first.min(count)..last.min(count)
}

/// Regions of the Today screen.
pub struct TodayLayout {
    pub date_area: Rect,
    pub title_area: Rect,
    pub list_area: Rect,
}

impl TodayLayout {
    pub fn from_area(area: Rect) -> Self {
        let header = HEADER_ROWS.min(area.height);
        let text_x = area.x + SIDE_PADDING.min(area.width);
        let text_w = area.width.saturating_sub(SIDE_PADDING);
        Self {
            date_area: Rect::new(text_x, area.y, text_w, header.min(1)),
            title_area: Rect::new(
                text_x,
                area.y + header.min(1),
                text_w,
                header.saturating_sub(1).min(1),
            ),
            list_area: Rect::new(area.x, area.y + header, area.width, area.height - header),
        }
    }
}

/// On-screen rect of card `index`, clipped to the list area.
/// `None` when the card is scrolled fully out of view.
pub fn card_rect(list_area: Rect, scroll: usize, index: usize) -> Option<Rect> {
    // Offset from the viewport in content rows; only this difference has to
    // fit in a cell coordinate.
    let rel = card_top(index) as f64 - scroll as f64;
    let top = f64::from(list_area.y) + rel;
    let unclipped = geometry::Rect::new(
        f64::from(list_area.x + SIDE_PADDING.min(list_area.width)),
        top,
        f64::from(list_area.width.saturating_sub(SIDE_PADDING * 2)),
        f64::from(CARD_HEIGHT),
    );
    let cells = to_cells(&unclipped, list_area);
    (cells.area() > 0).then_some(cells)
}

/// Which card (if any) is under a mouse position.
pub fn card_at(list_area: Rect, scroll: usize, count: usize, col: u16, row: u16) -> Option<usize> {
    visible_cards(scroll, list_area.height, count).find(|&i| {
        card_rect(list_area, scroll, i)
            .map_or(false, |r| super::layout::contains(r, col, row))
    })
}

// ───────────────────────────────────────── card body ─────────

/// Card face shared by the list and the detail surface header.
fn render_card_face(card: &TodayCard, inner: Rect, buf: &mut Buffer) {
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut lines = vec![
        Line::from(Span::styled(card.eyebrow.clone(), Theme::card_eyebrow_style())),
        Line::from(Span::styled(card.title.clone(), Theme::card_title_style())),
    ];
    // Push the app row to the bottom of the face.
    let filler = inner.height.saturating_sub(3) as usize;
    lines.extend(std::iter::repeat(Line::raw("")).take(filler));
    lines.push(Line::from(vec![
        Span::styled("▣ ", Style::default()),
        Span::styled(card.app_name.clone(), Theme::card_title_style()),
        Span::raw(format!(" — {}  ", card.tagline)),
        Span::styled(" GET ", Theme::get_button_style()),
    ]));

    Paragraph::new(lines).render(inner, buf);
}

// ───────────────────────────────────────── list widget ───────

/// The card list — created fresh each frame.
pub struct TodayWidget<'a> {
    cards: &'a [TodayCard],
    date_label: &'a str,
}

impl<'a> TodayWidget<'a> {
    pub fn new(cards: &'a [TodayCard], date_label: &'a str) -> Self {
        Self { cards, date_label }
    }
}

impl<'a> StatefulWidget for TodayWidget<'a> {
    type State = TodayState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let layout = TodayLayout::from_area(area);

        Paragraph::new(Line::from(Span::styled(
            self.date_label.to_uppercase(),
            Theme::date_style(),
        )))
        .render(layout.date_area, buf);
        Paragraph::new(Line::from(Span::styled("Today", Theme::today_title_style())))
            .render(layout.title_area, buf);

        if self.cards.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "Nothing new today.",
                Theme::date_style(),
            )))
            .render(layout.list_area, buf);
            return;
        }

        state.selected = state.selected.min(self.cards.len() - 1);
        state.clamp_scroll(layout.list_area.height);

        // The card being morphed is hidden in the list; the detail surface
        // stands in for it.
        let hidden = state.detail.as_ref().map(|d| d.card_index);

        let range = visible_cards(state.scroll, layout.list_area.height, self.cards.len());
        for (i, card) in self.cards.iter().enumerate().skip(range.start).take(range.len()) {
            if hidden == Some(i) {
                continue;
            }
            let Some(rect) = card_rect(layout.list_area, state.scroll, i) else {
                continue;
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::card_border_style(i == state.selected));
            let inner = block.inner(rect);
            block.render(rect, buf);
            render_card_face(card, inner, buf);
        }
    }
}

// ───────────────────────────────────────── detail surface ────

/// Host-side state of a mounted detail surface.
#[derive(Debug, Clone)]
pub struct DetailSurface {
    pub card_index: usize,
    pub animator: MorphAnimator,
    /// Set by the first render; the lifecycle dispatcher turns it into
    /// `finish_opening`.
    pub appeared: bool,
    /// Body text scroll (rows).
    pub body_scroll: u16,
    source: geometry::Rect,
}

impl DetailSurface {
    /// Mount a surface resting on the tapped card.
    pub fn mount(card_index: usize, source: geometry::Rect, morph_speed: f64) -> Self {
        Self {
            card_index,
            animator: MorphAnimator::new(source, morph_speed),
            appeared: false,
            body_scroll: 0,
            source,
        }
    }

    /// Morph progress from the tapped card towards the current target.
    pub fn progress(&self) -> f64 {
        self.animator.progress_from(&self.source)
    }

    /// The closing morph has come to rest on the card it started from.
    pub fn has_returned(&self, source: geometry::Rect) -> bool {
        self.animator.target() == source && self.animator.is_settled()
    }
}

/// Detail surface widget — draws wherever the morph currently is.
pub struct DetailWidget<'a> {
    card: &'a TodayCard,
    geometry: DetailGeometry,
    phase: Phase,
}

impl<'a> DetailWidget<'a> {
    pub fn new(card: &'a TodayCard, transition: &TransitionController) -> Option<Self> {
        Some(Self {
            card,
            geometry: transition.geometry()?,
            phase: transition.phase(),
        })
    }
}

impl<'a> StatefulWidget for DetailWidget<'a> {
    type State = DetailSurface;

    /// `area` is the surface's natural (fully expanded) rect.
    fn render(self, area: Rect, buf: &mut Buffer, surface: &mut Self::State) {
        surface.animator.retarget(self.geometry.resolve(to_geometry(area)));
        surface.appeared = true;

        let rect = to_cells(&surface.animator.current(), area);
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        Clear.render(rect, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::detail_border_style());
        let inner = block.inner(rect);
        block.render(rect, buf);

        let face_height = (CARD_HEIGHT - 2).min(inner.height);
        render_card_face(
            self.card,
            Rect::new(inner.x, inner.y, inner.width, face_height),
            buf,
        );

        // Body text only once the surface has fully arrived.
        let arrived = matches!(self.phase, Phase::Expanded { .. }) && surface.animator.is_settled();
        if !arrived || inner.height <= face_height + 2 {
            return;
        }

        let body_area = Rect::new(
            inner.x + 1,
            inner.y + face_height + 1,
            inner.width.saturating_sub(2),
            inner.height - face_height - 2,
        );
        Paragraph::new(self.card.body.as_str())
            .wrap(Wrap { trim: false })
            .scroll((surface.body_scroll, 0))
            .render(body_area, buf);

        let hint = Line::from(Span::styled(" Esc / click: close ", Theme::border_style()));
        let hint_y = rect.y + rect.height - 1;
        buf.set_line(rect.x + 2, hint_y, &hint, rect.width.saturating_sub(4));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::core::transition::MorphTransition;

    fn list() -> Rect {
        Rect::new(0, 3, 60, 20)
    }

    #[test]
    fn card_rects_follow_scroll() {
        assert_eq!(card_rect(list(), 0, 0), Some(Rect::new(2, 3, 56, 7)));
        assert_eq!(card_rect(list(), 0, 1), Some(Rect::new(2, 11, 56, 7)));
        // Partially visible at the bottom edge.
        assert_eq!(card_rect(list(), 0, 2), Some(Rect::new(2, 19, 56, 4)));
        assert_eq!(card_rect(list(), 0, 3), None);
        assert_eq!(card_rect(list(), 8, 1), Some(Rect::new(2, 3, 56, 7)));
    }

    #[test]
    fn hit_testing_picks_the_card_under_the_pointer() {
        assert_eq!(card_at(list(), 0, 5, 10, 12), Some(1));
        assert_eq!(card_at(list(), 0, 5, 10, 10), None); // gap row
        assert_eq!(card_at(list(), 0, 5, 0, 4), None); // side padding
    }

    #[test]
    fn selection_stays_visible() {
        let mut state = TodayState::default();
        state.selected = 4;
        state.clamp_scroll(20);
        assert_eq!(state.scroll, usize::from(4 * CARD_PITCH + CARD_HEIGHT - 20));
        state.selected = 0;
        state.clamp_scroll(20);
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn positions_do_not_saturate_on_long_lists() {
        let mut state = TodayState::default();
        state.selected = 8999;
        state.clamp_scroll(20);
        assert_eq!(state.scroll, 8999 * 8 + 7 - 20);

        let last = card_rect(list(), state.scroll, 8999).unwrap();
        assert_eq!(last, Rect::new(2, 16, 56, 7));
        assert_eq!(card_rect(list(), state.scroll, 8997), Some(Rect::new(2, 3, 56, 4)));
        assert_eq!(card_rect(list(), state.scroll, 8996), None);
        assert_eq!(card_at(list(), state.scroll, 9000, 10, 18), Some(8999));
        assert_eq!(card_at(list(), state.scroll, 9000, 10, 10), Some(8998));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        let mut state = TodayState::default();
        TodayWidget::new(&[], "Wednesday, March 18").render(area, &mut buf, &mut state);
        let row: String = (0..area.width)
            .map(|x| buf[(x, 3)].symbol().to_string())
            .collect();
        assert!(row.starts_with("Nothing new today."), "{row:?}");
    }

    #[test]
    fn detail_first_frame_sits_on_the_card() {
        let catalog = Catalog::sample();
        let area = Rect::new(0, 0, 60, 23);
        let card = card_rect(list(), 0, 1).unwrap();

        let mut transition = TransitionController::new();
        transition.open(to_geometry(card)).unwrap();
        let mut surface = DetailSurface::mount(1, to_geometry(card), 0.35);

        let mut buf = Buffer::empty(area);
        DetailWidget::new(&catalog.cards[1], &transition)
            .unwrap()
            .render(area, &mut buf, &mut surface);

        assert!(surface.appeared);
        assert_eq!(surface.animator.current(), to_geometry(card));
        assert_eq!(buf[(card.x, card.y)].symbol(), "╭");
    }
}
