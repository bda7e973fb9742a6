//! The browse screen — a tall scrolling column of shelves under a header
//! that fades out as the content scrolls up beneath it.
//!
//! Each render is one layout pass: the widget reports where the top of its
//! content landed to the [`ScrollOffsetTracker`], and the header reads the
//! committed offset back through a [`HeaderFade`] subscription.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget, Widget, Wrap},
};
use tokio::sync::watch;

use crate::core::{
    catalog::{Catalog, Movie},
    geometry::Point,
    scroll::{ScrollOffset, ScrollOffsetTracker},
};

use super::smooth_scroll::SmoothScroll;
use super::theme::{self, Theme};

const HERO_ROWS: u16 = 10;
const PREVIEW_ROWS: u16 = 6;
const SHELF_ROWS: u16 = 8;
const PLAYER_ROWS: u16 = 13;
const POSTER_WIDTH: u16 = 14;
const CIRCLE_WIDTH: u16 = 16;

// ───────────────────────────────────────── header fade ───────

/// Header opacity for a vertical scroll offset: fully opaque at rest,
/// fully transparent once scrolled `fade_distance` rows, never negative.
pub fn header_opacity(offset_y: f64, fade_distance: f64) -> f64 {
    if fade_distance <= 0.0 {
        return if offset_y <= 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - offset_y / fade_distance).clamp(0.0, 1.0)
}

/// Subscriber that turns the published scroll offset into header opacity.
#[derive(Debug, Clone)]
pub struct HeaderFade {
    offsets: watch::Receiver<ScrollOffset>,
    fade_distance: f64,
}

impl HeaderFade {
    pub fn new(offsets: watch::Receiver<ScrollOffset>, fade_distance: f64) -> Self {
        Self {
            offsets,
            fade_distance,
        }
    }

    pub fn opacity(&self) -> f64 {
        header_opacity(self.offsets.borrow().y, self.fade_distance)
    }
}

// ───────────────────────────────────────── sections ──────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Hero,
    Previews,
    /// Index into `Catalog::shelves`.
    Shelf(usize),
    Player,
}

/// One vertical block of content, in content rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub top: u16,
    pub height: u16,
}

impl Section {
    /// Horizontal carousels take part in the index relay.
    pub fn carousel(&self) -> Option<usize> {
        match self.kind {
            SectionKind::Previews => Some(0),
            SectionKind::Shelf(i) => Some(i + 1),
            SectionKind::Hero | SectionKind::Player => None,
        }
    }
}

/// Stack the catalog into sections: hero, previews, first shelf, the
/// preview player, then the remaining shelves.
pub fn build_sections(catalog: &Catalog) -> Vec<Section> {
    let mut kinds = vec![SectionKind::Hero];
    if !catalog.previews.is_empty() {
        kinds.push(SectionKind::Previews);
    }
    let mut shelves = (0..catalog.shelves.len()).map(SectionKind::Shelf);
    kinds.extend(shelves.next());
    kinds.push(SectionKind::Player);
    kinds.extend(shelves);

    let mut top = 0u16;
    kinds
        .into_iter()
        .map(|kind| {
            let height = match kind {
                SectionKind::Hero => HERO_ROWS,
                SectionKind::Previews => PREVIEW_ROWS,
                SectionKind::Shelf(_) => SHELF_ROWS,
                SectionKind::Player => PLAYER_ROWS,
            };
            let section = Section { kind, top, height };
            top = top.saturating_add(height);
            section
        })
        .collect()
}

pub fn content_height(sections: &[Section]) -> u16 {
    sections.last().map_or(0, |s| s.top.saturating_add(s.height))
}

// ───────────────────────────────────────── state ─────────────

#[derive(Debug)]
pub struct BrowseState {
    pub sections: Vec<Section>,
    pub scroll: SmoothScroll,
    pub tracker: ScrollOffsetTracker,
    pub fade: HeaderFade,
    /// Selected item per carousel (previews first, then shelves).
    pub carousel_index: Vec<usize>,
    pub is_playing: bool,
    /// The player has been on screen at least once.
    pub player_appeared: bool,
    /// Body height seen by the last render.
    pub viewport_height: u16,
}

impl BrowseState {
    pub fn new(catalog: &Catalog, fade_distance: f64, scroll_speed: f64) -> Self {
        let tracker = ScrollOffsetTracker::new();
        let fade = HeaderFade::new(tracker.subscribe(), fade_distance);
        Self {
            sections: build_sections(catalog),
            scroll: SmoothScroll::new(scroll_speed),
            tracker,
            fade,
            carousel_index: vec![0; catalog.shelves.len() + 1],
            is_playing: false,
            player_appeared: false,
            viewport_height: 0,
        }
    }

    pub fn max_scroll(&self) -> u16 {
        content_height(&self.sections).saturating_sub(self.viewport_height)
    }

    /// Move the scroll target by `delta` rows (animated).
    pub fn scroll_by(&mut self, delta: i32) {
        let max = f64::from(self.max_scroll());
        // The viewport may have grown since the target was set.
        let from = self.scroll.target().clamp(0.0, max);
        self.scroll.set_target((from + f64::from(delta)).clamp(0.0, max));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.set_target(0.0);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll.set_target(f64::from(self.max_scroll()));
    }

    /// The topmost carousel that is at least partly on screen.
    pub fn focused_carousel(&self) -> Option<usize> {
        let top = self.scroll.row_offset();
        let bottom = top.saturating_add(self.viewport_height);
        self.sections
            .iter()
            .filter(|s| s.top.saturating_add(s.height) > top && s.top < bottom)
            .find_map(|s| s.carousel())
    }

    /// Relay a left/right step to the focused carousel, clamped to its length.
    pub fn step_carousel(&mut self, catalog: &Catalog, delta: i32) {
        let Some(carousel) = self.focused_carousel() else {
            return;
        };
        let len = match carousel {
            0 => catalog.previews.len(),
            i => catalog.shelves.get(i - 1).map_or(0, |s| s.movies.len()),
        };
        if len == 0 {
            return;
        }
        if let Some(index) = self.carousel_index.get_mut(carousel) {
            let next = (*index as i64 + i64::from(delta)).clamp(0, len as i64 - 1);
            *index = next as usize;
        }
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }
}

// ───────────────────────────────────────── widget ────────────

pub struct BrowseWidget<'a> {
    catalog: &'a Catalog,
}

impl<'a> BrowseWidget<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }
}

impl<'a> StatefulWidget for BrowseWidget<'a> {
    type State = BrowseState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        buf.set_style(area, Theme::browse_style());
        state.viewport_height = area.height;

        let scroll = state.scroll.row_offset().min(state.max_scroll());

        // Layout pass: the zero-height probe sits on the first content row.
        let mut pass = state.tracker.begin_pass();
        pass.report_probe(
            Point::new(f64::from(area.x), f64::from(area.y) - f64::from(scroll)),
            Point::new(f64::from(area.x), f64::from(area.y)),
        );
        pass.commit();

        let focused = state.focused_carousel();
        for section in &state.sections {
            let Some(visible) = section_viewport(area, scroll, section) else {
                continue;
            };
            if section.kind == SectionKind::Player && !state.player_appeared {
                // First appearance starts playback.
                state.player_appeared = true;
                state.is_playing = true;
            }
            let mut scratch = Buffer::empty(Rect::new(0, 0, area.width, section.height));
            scratch.set_style(scratch.area, Theme::browse_style());
            let selected = section
                .carousel()
                .and_then(|c| state.carousel_index.get(c).copied())
                .unwrap_or(0);
            let is_focused = section.carousel().is_some() && section.carousel() == focused;
            render_section(
                self.catalog,
                section.kind,
                SectionView {
                    selected,
                    focused: is_focused,
                    playing: state.is_playing,
                },
                &mut scratch,
            );
            blit(&scratch, visible.skip_rows, visible.area, buf);
        }

        render_header(area, state.fade.opacity(), buf);
    }
}

/// The part of a section that lands on screen.
struct Visible {
    area: Rect,
    /// Rows of the section hidden above the viewport.
    skip_rows: u16,
}

fn section_viewport(area: Rect, scroll: u16, section: &Section) -> Option<Visible> {
    let top = i32::from(section.top) - i32::from(scroll);
    let bottom = top + i32::from(section.height);
    let visible_top = top.max(0);
    let visible_bottom = bottom.min(i32::from(area.height));
    if visible_bottom <= visible_top {
        return None;
    }
    Some(Visible {
        area: Rect::new(
            area.x,
            area.y + visible_top as u16,
            area.width,
            (visible_bottom - visible_top) as u16,
        ),
        skip_rows: (visible_top - top) as u16,
    })
}

/// Copy rows `skip..` of `src` into `dst_area` of `dst`.
fn blit(src: &Buffer, skip: u16, dst_area: Rect, dst: &mut Buffer) {
    for row in 0..dst_area.height {
        for col in 0..dst_area.width.min(src.area.width) {
            let sy = skip + row;
            if sy >= src.area.height {
                return;
            }
            dst[(dst_area.x + col, dst_area.y + row)] = src[(col, sy)].clone();
        }
    }
}

struct SectionView {
    selected: usize,
    focused: bool,
    playing: bool,
}

fn render_section(catalog: &Catalog, kind: SectionKind, view: SectionView, buf: &mut Buffer) {
    let area = buf.area;
    match kind {
        SectionKind::Hero => render_hero(&catalog.hero, area, buf),
        SectionKind::Previews => {
            render_carousel("Previews", &catalog.previews, &view, CIRCLE_WIDTH, true, area, buf)
        }
        SectionKind::Shelf(i) => {
            if let Some(shelf) = catalog.shelves.get(i) {
                render_carousel(&shelf.title, &shelf.movies, &view, POSTER_WIDTH, false, area, buf);
            }
        }
        SectionKind::Player => render_player(&catalog.featured, view.playing, area, buf),
    }
}

fn render_hero(movie: &Movie, area: Rect, buf: &mut Buffer) {
    // Leave the top row for the header overlay.
    let lines = vec![
        Line::raw(""),
        Line::raw(""),
        Line::raw(""),
        Line::from(Span::styled(
            movie.title.clone(),
            Theme::section_title_style().add_modifier(Modifier::UNDERLINED),
        ))
        .centered(),
        Line::raw(""),
        Line::from("Spine-chilling · Exciting").centered(),
        Line::raw(""),
        Line::from(vec![
            Span::raw("＋ My List     "),
            Span::styled("  ▶ Play  ", Theme::play_button_style()),
            Span::raw("     ⓘ Info"),
        ])
        .centered(),
    ];
    Paragraph::new(lines).render(area, buf);
}

fn render_carousel(
    title: &str,
    movies: &[Movie],
    view: &SectionView,
    item_width: u16,
    round: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let title_style = if view.focused {
        Theme::section_title_style().add_modifier(Modifier::UNDERLINED)
    } else {
        Theme::section_title_style()
    };
    buf.set_line(area.x + 1, area.y, &Line::from(Span::styled(title, title_style)), area.width);

    // Keep the selected item on screen.
    let per_screen = usize::from((area.width.saturating_sub(1) / (item_width + 1)).max(1));
    let first = view.selected.saturating_sub(per_screen - 1);

    for (slot, (i, movie)) in movies.iter().enumerate().skip(first).take(per_screen).enumerate() {
        let x = area.x + 1 + slot as u16 * (item_width + 1);
        let tile = Rect::new(x, area.y + 1, item_width, area.height.saturating_sub(2));
        if tile.right() > area.right() || tile.height < 3 {
            break;
        }
        let focused = view.focused && i == view.selected;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if round { BorderType::Rounded } else { BorderType::Plain })
            .border_style(Theme::poster_style(focused));
        let inner = block.inner(tile);
        block.render(tile, buf);
        Paragraph::new(Line::from(Span::styled(movie.title.clone(), Theme::poster_style(focused))))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

fn render_player(movie: &Movie, playing: bool, area: Rect, buf: &mut Buffer) {
    buf.set_line(
        area.x + 1,
        area.y,
        &Line::from(Span::styled("Now Streaming: Season 1", Theme::section_title_style())),
        area.width,
    );

    let screen = Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        9.min(area.height.saturating_sub(1)),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border_style())
        .title(Span::raw(format!(" {} ", movie.title)));
    let inner = block.inner(screen);
    block.render(screen, buf);

    let badge = match (&movie.media, playing) {
        (None, _) => "no preview available",
        (Some(_), true) => "▶ playing",
        (Some(_), false) => "❚❚ paused",
    };
    if inner.height > 0 {
        let mid = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
        Paragraph::new(Line::from(badge).centered()).render(mid, buf);
    }

    let buttons_y = screen.bottom();
    if buttons_y < area.bottom() {
        let half = area.width.saturating_sub(3) / 2;
        let play = Rect::new(area.x + 1, buttons_y, half, 1);
        let list = Rect::new(area.x + 2 + half, buttons_y, half, 1);
        Paragraph::new(Line::from("▶ Play").centered())
            .style(Theme::play_button_style())
            .render(play, buf);
        Paragraph::new(Line::from("＋ My List").centered())
            .style(Theme::secondary_button_style())
            .render(list, buf);
    }
}

fn render_header(area: Rect, opacity: f64, buf: &mut Buffer) {
    if opacity <= 0.0 || area.height == 0 {
        return;
    }
    let fg = theme::blend(theme::HEADER_FG, theme::BROWSE_BG, opacity);
    let brand = theme::blend(theme::BRAND_FG, theme::BROWSE_BG, opacity);
    let style = Style::default().fg(fg);

    let labels = ["TV Shows", "Movies", "My List"];
    let row = Rect::new(area.x, area.y, area.width, 1);
    let mut spans = vec![Span::styled(
        " N",
        Style::default().fg(brand).add_modifier(Modifier::BOLD),
    )];
    // Spread the labels evenly across the remaining width.
    let used: usize = 2 + labels.iter().map(|l| l.chars().count()).sum::<usize>();
    let gap = (usize::from(area.width).saturating_sub(used + 1) / labels.len()).max(1);
    for label in labels {
        spans.push(Span::raw(" ".repeat(gap)));
        spans.push(Span::styled(label, style));
    }
    buf.set_line(row.x, row.y, &Line::from(spans), row.width);
}
