//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::catalog::Catalog;
use crate::ui::{browse::BrowseState, today::TodayState};

/// Which demo screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Screen {
    #[default]
    Today,
    Browse,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Screen::Today => Screen::Browse,
            Screen::Browse => Screen::Today,
        }
    }
}

/// Top-level application state.
pub struct AppState {
    /// Content shown by both screens.
    pub catalog: Catalog,
    /// User-configurable keybindings and tuning.
    pub config: AppConfig,
    pub screen: Screen,
    pub today: TodayState,
    pub browse: BrowseState,
    /// Pre-formatted date for the Today header.
    pub date_label: String,
    /// Whether the controls popup is open.
    pub show_help: bool,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Full terminal area as of the last draw or resize.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(catalog: Catalog, config: AppConfig, screen: Screen, date_label: String) -> Self {
        let browse = BrowseState::new(&catalog, config.fade_distance, config.scroll_speed);
        Self {
            catalog,
            config,
            screen,
            today: TodayState::default(),
            browse,
            date_label,
            show_help: false,
            should_quit: false,
            status_message: None,
            terminal_area: Rect::default(),
        }
    }
}
