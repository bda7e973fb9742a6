//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

/// Browse screen background (a very dark grey).
pub const BROWSE_BG: (u8, u8, u8) = (26, 26, 26);
/// Browse header foreground at full opacity.
pub const HEADER_FG: (u8, u8, u8) = (255, 255, 255);
/// The brand letter in the browse header.
pub const BRAND_FG: (u8, u8, u8) = (229, 9, 20);

impl Theme {
    // ── today ──────────────────────────────────────────────────
    pub fn date_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn today_title_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_border_style(selected: bool) -> Style {
        if selected {
            Style::default().fg(Color::LightCyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    pub fn card_eyebrow_style() -> Style {
        Style::default()
            .fg(Color::LightYellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_title_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn get_button_style() -> Style {
        Style::default()
            .fg(Color::Blue)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn detail_border_style() -> Style {
        Style::default().fg(Color::White)
    }

    // ── browse ─────────────────────────────────────────────────
    pub fn browse_style() -> Style {
        Style::default().bg(rgb(BROWSE_BG)).fg(Color::White)
    }

    pub fn section_title_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn poster_style(focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub fn play_button_style() -> Style {
        Style::default().fg(Color::Black).bg(Color::White)
    }

    pub fn secondary_button_style() -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Mix `fg` over `bg` at `alpha` (0 = all background, 1 = all foreground).
/// Terminals have no per-cell opacity, so fading is done by colour blending.
pub fn blend(fg: (u8, u8, u8), bg: (u8, u8, u8), alpha: f64) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (f64::from(b) + (f64::from(f) - f64::from(b)) * a).round() as u8;
    Color::Rgb(mix(fg.0, bg.0), mix(fg.1, bg.1), mix(fg.2, bg.2))
}
