//! Per-frame composition of the whole terminal.

use ratatui::{widgets::Paragraph, Frame};

use crate::app::state::{AppState, Screen};
use crate::config::Action;
use crate::core::transition::Phase;

use super::browse::BrowseWidget;
use super::layout::AppLayout;
use super::popup::HelpPopup;
use super::theme::Theme;
use super::today::{DetailWidget, TodayWidget};

/// Render one frame.  Also records the terminal size so input handling
/// can hit-test against what was actually drawn.
pub fn draw(frame: &mut Frame, state: &mut AppState) {
    state.terminal_area = frame.area();
    let layout = AppLayout::from_area(frame.area());

    match state.screen {
        Screen::Today => {
            frame.render_stateful_widget(
                TodayWidget::new(&state.catalog.cards, &state.date_label),
                layout.body_area,
                &mut state.today,
            );
            if let Some(surface) = state.today.detail.as_mut() {
                let card = state.catalog.cards.get(surface.card_index);
                let widget =
                    card.and_then(|card| DetailWidget::new(card, &state.today.transition));
                if let Some(widget) = widget {
                    frame.render_stateful_widget(widget, layout.body_area, surface);
                }
            }
        }
        Screen::Browse => {
            frame.render_stateful_widget(
                BrowseWidget::new(&state.catalog),
                layout.body_area,
                &mut state.browse,
            );
        }
    }

    let hint = status_hint(state);
    let status_text = state.status_message.as_deref().unwrap_or(&hint);
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    if state.show_help {
        frame.render_widget(HelpPopup { config: &state.config }, frame.area());
    }
}

fn status_hint(state: &AppState) -> String {
    let keys = |a: Action| state.config.short_binding(a);
    match state.screen {
        Screen::Today => {
            let phase = match state.today.transition.phase() {
                Phase::Idle => "idle".to_string(),
                p => {
                    let name = match p {
                        Phase::Opening { .. } => "opening",
                        Phase::Expanded { .. } => "expanded",
                        _ => "closing",
                    };
                    let progress = state.today.detail.as_ref().map_or(0.0, |d| d.progress());
                    format!("{name} {:>3.0}%", progress * 100.0)
                }
            };
            format!(
                " {} open  {} close  {} browse  {} help  {} quit │ {phase}",
                keys(Action::Open),
                keys(Action::Close),
                keys(Action::SwitchScreen),
                keys(Action::Help),
                keys(Action::Quit),
            )
        }
        Screen::Browse => {
            let offset = state.browse.tracker.current_offset();
            format!(
                " {}/{} scroll  {}/{} carousel  {} play  {} today  {} quit │ offset {:.0}  header {:.2}",
                keys(Action::MoveUp),
                keys(Action::MoveDown),
                keys(Action::PrevItem),
                keys(Action::NextItem),
                keys(Action::TogglePlay),
                keys(Action::SwitchScreen),
                keys(Action::Quit),
                offset.y,
                state.browse.fade.opacity(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::catalog::Catalog;
    use ratatui::{backend::TestBackend, Terminal};

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn status_bar_tracks_the_active_screen() {
        let mut state = AppState::new(
            Catalog::sample(),
            AppConfig::default(),
            Screen::Today,
            "Wednesday, March 18".into(),
        );
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();

        terminal.draw(|f| draw(f, &mut state)).unwrap();
        assert_eq!(state.terminal_area.height, 24);
        assert!(row_text(&terminal, 23).contains("idle"));
        assert!(row_text(&terminal, 0).contains("WEDNESDAY, MARCH 18"));

        state.screen = Screen::Browse;
        terminal.draw(|f| draw(f, &mut state)).unwrap();
        assert!(row_text(&terminal, 23).contains("header 1.00"));
    }
}
