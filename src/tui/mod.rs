//! Terminal dashboard.
//!
//! Renders the shortcut grid/list with ratatui and maps key presses onto
//! [`App`](crate::App) actions.

mod app;
mod input;
mod theme;
mod ui;

pub use app::run_tui;
pub use input::handle_events;
pub use theme::Theme;
pub use ui::draw;
