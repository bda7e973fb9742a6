//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  Screens are stateful widgets rebuilt every frame; their
//! persistent state lives in [`crate::app::state::AppState`].

pub mod browse;
pub mod layout;
pub mod morph;
pub mod popup;
pub mod screen;
pub mod smooth_scroll;
pub mod theme;
pub mod today;
