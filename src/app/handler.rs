//! Input handling — maps key/mouse events to state mutations, and turns
//! per-frame observations into transition lifecycle callbacks.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::config::Action;
use crate::core::transition::{MorphTransition, Phase};
use crate::ui::layout::{to_geometry, AppLayout};
use crate::ui::today::{card_at, card_rect, DetailSurface, TodayLayout};

use super::state::{AppState, Screen};

/// Rows moved per scroll step on the browse screen.
const SCROLL_STEP: i32 = 3;

/// Process a key event, dispatching based on the active screen.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+c always quits, regardless of screen.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.show_help {
        // Any key closes the popup.
        state.show_help = false;
        return;
    }

    // Navigation keys that are not rebindable.
    if handle_fixed_key(state, key.code) {
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::Help => state.show_help = true,
        _ => match state.screen {
            Screen::Today => handle_today_action(state, action),
            Screen::Browse => handle_browse_action(state, action),
        },
    }
}

fn handle_fixed_key(state: &mut AppState, code: KeyCode) -> bool {
    match (state.screen, code) {
        (Screen::Browse, KeyCode::PageUp) => {
            let page = i32::from(state.browse.viewport_height.max(1));
            state.browse.scroll_by(-page);
        }
        (Screen::Browse, KeyCode::PageDown) => {
            let page = i32::from(state.browse.viewport_height.max(1));
            state.browse.scroll_by(page);
        }
        (Screen::Browse, KeyCode::Home) => state.browse.scroll_to_top(),
        (Screen::Browse, KeyCode::End) => state.browse.scroll_to_bottom(),
        (Screen::Today, KeyCode::Home) if state.today.transition.is_idle() => {
            state.today.selected = 0;
        }
        (Screen::Today, KeyCode::End) if state.today.transition.is_idle() => {
            state.today.selected = state.catalog.cards.len().saturating_sub(1);
        }
        _ => return false,
    }
    true
}

// ── Today ───────────────────────────────────────────────────────

fn handle_today_action(state: &mut AppState, action: Action) {
    if state.today.transition.is_presenting() {
        // While a detail surface is mounted only it gets input.
        match action {
            Action::Open | Action::Close => dismiss(state),
            Action::MoveUp => scroll_detail_body(state, -1),
            Action::MoveDown => scroll_detail_body(state, 1),
            Action::SwitchScreen => {
                state.status_message = Some("Close the card before switching screens".into());
            }
            _ => {}
        }
        return;
    }

    match action {
        Action::MoveUp => state.today.select_prev(),
        Action::MoveDown => state.today.select_next(state.catalog.cards.len()),
        Action::Open => {
            let index = state.today.selected;
            open_card(state, index);
        }
        Action::SwitchScreen => switch_screen(state),
        _ => {}
    }
}

fn today_list_area(state: &AppState) -> Rect {
    let layout = AppLayout::from_area(state.terminal_area);
    TodayLayout::from_area(layout.body_area).list_area
}

/// Tap-to-open: capture the card's on-screen rect and start the morph.
fn open_card(state: &mut AppState, index: usize) {
    if index >= state.catalog.cards.len() {
        return;
    }
    let list = today_list_area(state);
    state.today.selected = index;
    state.today.clamp_scroll(list.height);

    let Some(rect) = card_rect(list, state.today.scroll, index) else {
        return;
    };
    let source = to_geometry(rect);
    match state.today.transition.open(source) {
        Ok(()) => {
            state.today.detail = Some(DetailSurface::mount(index, source, state.config.morph_speed));
            state.status_message = None;
        }
        Err(err) => tracing::debug!("open ignored: {err}"),
    }
}

/// Generic dismiss gesture — collapse back into the preserved rect.
fn dismiss(state: &mut AppState) {
    if let Err(err) = state.today.transition.dismiss() {
        tracing::debug!("dismiss ignored: {err}");
    }
}

fn scroll_detail_body(state: &mut AppState, delta: i32) {
    if !matches!(state.today.transition.phase(), Phase::Expanded { .. }) {
        return;
    }
    if let Some(detail) = state.today.detail.as_mut() {
        detail.body_scroll = detail.body_scroll.saturating_add_signed(delta as i16);
    }
}

fn switch_screen(state: &mut AppState) {
    state.screen = state.screen.next();
    state.status_message = None;
}

// ── Browse ──────────────────────────────────────────────────────

fn handle_browse_action(state: &mut AppState, action: Action) {
    match action {
        Action::MoveUp => state.browse.scroll_by(-SCROLL_STEP),
        Action::MoveDown => state.browse.scroll_by(SCROLL_STEP),
        Action::PrevItem => state.browse.step_carousel(&state.catalog, -1),
        Action::NextItem => state.browse.step_carousel(&state.catalog, 1),
        Action::TogglePlay => state.browse.toggle_play(),
        Action::SwitchScreen => switch_screen(state),
        _ => {}
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.show_help {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            state.show_help = false;
        }
        return;
    }

    match state.screen {
        Screen::Today => handle_today_mouse(state, mouse),
        Screen::Browse => match mouse.kind {
            MouseEventKind::ScrollUp => state.browse.scroll_by(-SCROLL_STEP),
            MouseEventKind::ScrollDown => state.browse.scroll_by(SCROLL_STEP),
            _ => {}
        },
    }
}

fn handle_today_mouse(state: &mut AppState, mouse: MouseEvent) {
    let presenting = state.today.transition.is_presenting();
    match mouse.kind {
        // A tap anywhere on the expanded surface dismisses it.
        MouseEventKind::Down(MouseButton::Left) if presenting => dismiss(state),
        MouseEventKind::Down(MouseButton::Left) => {
            let list = today_list_area(state);
            let hit = card_at(
                list,
                state.today.scroll,
                state.catalog.cards.len(),
                mouse.column,
                mouse.row,
            );
            if let Some(index) = hit {
                open_card(state, index);
            }
        }
        MouseEventKind::ScrollUp if presenting => scroll_detail_body(state, -1),
        MouseEventKind::ScrollDown if presenting => scroll_detail_body(state, 1),
        MouseEventKind::ScrollUp => state.today.select_prev(),
        MouseEventKind::ScrollDown => state.today.select_next(state.catalog.cards.len()),
        _ => {}
    }
}

// ── Frame lifecycle ─────────────────────────────────────────────

/// Advance animations by one frame.
pub fn on_tick(state: &mut AppState) {
    if let Some(detail) = state.today.detail.as_mut() {
        detail.animator.tick();
    }
    state.browse.scroll.tick();
}

/// Run after every draw: report what the frame showed back to the
/// transition machine.
///
/// * opening, and the surface has been drawn on the tapped card → `finish_opening`
/// * closing, and the surface has shrunk back onto the card → `finish_collapse`,
///   then unmount
pub fn dispatch_lifecycle(state: &mut AppState) {
    let today = &mut state.today;
    let Some(detail) = today.detail.as_ref() else {
        return;
    };

    let result = match today.transition.phase() {
        Phase::Opening { .. } if detail.appeared => today.transition.finish_opening(),
        Phase::Closing { source } if detail.has_returned(source) => {
            today.transition.finish_collapse()
        }
        _ => Ok(()),
    };
    if let Err(err) = result {
        tracing::debug!("lifecycle callback ignored: {err}");
    }

    if today.transition.is_idle() {
        today.detail = None;
        // Hints about the closed card no longer apply.
        state.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::catalog::Catalog;
    use crate::core::transition::TransitionState;
    use crate::ui::screen;
    use ratatui::{backend::TestBackend, Terminal};

    fn app(cards: usize) -> (AppState, Terminal<TestBackend>) {
        let state = AppState::new(
            Catalog::with_card_count(cards),
            AppConfig::default(),
            Screen::Today,
            "Wednesday, March 18".into(),
        );
        let terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        (state, terminal)
    }

    /// One iteration of the main loop without input.
    fn frame(state: &mut AppState, terminal: &mut Terminal<TestBackend>) {
        terminal.draw(|f| screen::draw(f, state)).unwrap();
        dispatch_lifecycle(state);
    }

    fn press(state: &mut AppState, code: KeyCode) {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn click(state: &mut AppState, column: u16, row: u16) {
        handle_mouse(
            state,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    #[test]
    fn open_and_dismiss_round_trip() {
        let (mut state, mut terminal) = app(5);
        frame(&mut state, &mut terminal);

        press(&mut state, KeyCode::Down);
        frame(&mut state, &mut terminal);
        press(&mut state, KeyCode::Enter);

        let source = state.today.transition.preserved_source().unwrap();
        let expected = card_rect(today_list_area(&state), state.today.scroll, 1).unwrap();
        assert_eq!(source, to_geometry(expected));
        assert_eq!(
            state.today.transition.state(),
            Some(TransitionState::Collapsed { source_rect: source })
        );

        // First frame draws on the card, then the dispatcher flips to expanded.
        frame(&mut state, &mut terminal);
        assert_eq!(state.today.transition.state(), Some(TransitionState::Expanded));

        for _ in 0..60 {
            on_tick(&mut state);
            frame(&mut state, &mut terminal);
        }
        let detail = state.today.detail.as_ref().unwrap();
        assert!(detail.animator.is_settled());
        assert_eq!(detail.progress(), 1.0);

        press(&mut state, KeyCode::Esc);
        assert_eq!(
            state.today.transition.state(),
            Some(TransitionState::Collapsed { source_rect: source })
        );

        for _ in 0..60 {
            on_tick(&mut state);
            frame(&mut state, &mut terminal);
        }
        assert_eq!(state.today.transition.state(), None);
        assert!(state.today.detail.is_none());

        // Idle again: the next open is accepted.
        press(&mut state, KeyCode::Enter);
        assert!(state.today.transition.is_presenting());
    }

    #[test]
    fn click_opens_the_card_under_the_pointer() {
        let (mut state, mut terminal) = app(5);
        frame(&mut state, &mut terminal);

        let list = today_list_area(&state);
        let third = card_rect(list, state.today.scroll, 2).unwrap();
        click(&mut state, third.x + 3, third.y + 1);

        assert_eq!(state.today.selected, 2);
        assert_eq!(
            state.today.transition.preserved_source(),
            Some(to_geometry(third))
        );
    }

    #[test]
    fn dismiss_before_the_surface_appears_is_ignored() {
        let (mut state, mut terminal) = app(5);
        frame(&mut state, &mut terminal);
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Esc);
        assert!(matches!(
            state.today.transition.phase(),
            Phase::Opening { .. }
        ));
        frame(&mut state, &mut terminal);
        assert!(matches!(
            state.today.transition.phase(),
            Phase::Expanded { .. }
        ));
    }

    #[test]
    fn collapse_returns_to_the_tapped_rect_after_resize() {
        let (mut state, mut terminal) = app(5);
        frame(&mut state, &mut terminal);
        press(&mut state, KeyCode::Enter);
        let source = state.today.transition.preserved_source().unwrap();
        frame(&mut state, &mut terminal);

        terminal.backend_mut().resize(120, 40);
        for _ in 0..5 {
            on_tick(&mut state);
            frame(&mut state, &mut terminal);
        }

        click(&mut state, 1, 1);
        assert_eq!(
            state.today.transition.state(),
            Some(TransitionState::Collapsed { source_rect: source })
        );
    }

    #[test]
    fn screen_switch_waits_for_the_card_to_close() {
        let (mut state, mut terminal) = app(5);
        frame(&mut state, &mut terminal);
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.screen, Screen::Today);

        let (mut state, _) = app(5);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.screen, Screen::Browse);
    }

    #[test]
    fn closing_the_card_clears_its_status_hint() {
        let (mut state, mut terminal) = app(5);
        frame(&mut state, &mut terminal);
        press(&mut state, KeyCode::Enter);
        frame(&mut state, &mut terminal);
        press(&mut state, KeyCode::Tab);
        assert!(state.status_message.is_some());

        press(&mut state, KeyCode::Esc);
        for _ in 0..60 {
            on_tick(&mut state);
            frame(&mut state, &mut terminal);
        }
        assert!(state.today.transition.is_idle());
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn last_card_of_a_long_list_opens_by_key_and_click() {
        let (mut state, mut terminal) = app(9000);
        frame(&mut state, &mut terminal);
        press(&mut state, KeyCode::End);
        frame(&mut state, &mut terminal);
        assert_eq!(state.today.selected, 8999);

        let list = today_list_area(&state);
        let last = card_rect(list, state.today.scroll, 8999).unwrap();
        press(&mut state, KeyCode::Enter);
        assert_eq!(
            state.today.transition.preserved_source(),
            Some(to_geometry(last))
        );

        // Back to idle, then hit the same card with the mouse.
        frame(&mut state, &mut terminal);
        press(&mut state, KeyCode::Esc);
        for _ in 0..60 {
            on_tick(&mut state);
            frame(&mut state, &mut terminal);
        }
        assert!(state.today.transition.is_idle());

        state.today.selected = 0;
        click(&mut state, last.x + 3, last.y + 1);
        assert_eq!(state.today.selected, 8999);
        assert_eq!(
            state.today.transition.preserved_source(),
            Some(to_geometry(last))
        );
    }

    #[test]
    fn empty_today_list_never_opens() {
        let (mut state, mut terminal) = app(0);
        frame(&mut state, &mut terminal);
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::End);
        click(&mut state, 5, 5);
        assert!(state.today.transition.is_idle());
    }

    #[test]
    fn browse_scroll_fades_the_header() {
        let (mut state, mut terminal) = app(5);
        state.screen = Screen::Browse;
        frame(&mut state, &mut terminal);
        assert_eq!(state.browse.fade.opacity(), 1.0);

        press(&mut state, KeyCode::PageDown);
        for _ in 0..40 {
            on_tick(&mut state);
            frame(&mut state, &mut terminal);
        }
        // Content is shorter than two pages, so the jump stops at the bottom.
        let offset = state.browse.tracker.current_offset();
        assert_eq!(offset.y, f64::from(state.browse.max_scroll()));
        assert!(offset.y >= state.config.fade_distance);
        assert_eq!(state.browse.fade.opacity(), 0.0);

        press(&mut state, KeyCode::Home);
        for _ in 0..40 {
            on_tick(&mut state);
            frame(&mut state, &mut terminal);
        }
        assert_eq!(state.browse.tracker.current_offset().y, 0.0);
        assert_eq!(state.browse.fade.opacity(), 1.0);
    }

    #[test]
    fn help_popup_swallows_the_next_key() {
        let (mut state, _) = app(5);
        press(&mut state, KeyCode::Char('?'));
        assert!(state.show_help);
        press(&mut state, KeyCode::Char('q'));
        assert!(!state.show_help);
        assert!(!state.should_quit);
        press(&mut state, KeyCode::Char('q'));
        assert!(state.should_quit);
    }
}
