//! Non-transaction dialogs
//!
//! Each dialog owns its model, maps keys to its own outcome type, and draws
//! itself into the area the host gives it.

pub mod character;
pub mod preferences;
pub mod quests;
pub mod save_menu;
pub mod stats;
pub mod tell;

pub use character::{CharacterCreation, CharacterOutcome, CharacterRow};
pub use preferences::PreferencesDialog;
pub use quests::QuestLog;
pub use save_menu::{SaveMenu, SaveMenuKind, SaveMenuOutcome};
pub use stats::StatsSheet;
pub use tell::{TellDialog, TellOutcome};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
};

/// Bordered frame shared by every dialog
pub fn dialog_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Yellow))
}

/// Help line at the bottom of a dialog
pub fn help_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Split a dialog's inner area into body and a one-line help footer
pub fn body_and_footer(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}
