//! Preferences dialog

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{body_and_footer, dialog_block, help_style};
use crate::save::Preferences;

/// Edits a copy of the preferences; the host commits it on close
#[derive(Debug, Clone)]
pub struct PreferencesDialog {
    draft: Preferences,
    changed: bool,
}

impl PreferencesDialog {
    pub fn new(current: &Preferences) -> Self {
        Self {
            draft: current.clone(),
            changed: false,
        }
    }

    pub fn draft(&self) -> &Preferences {
        &self.draft
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    /// True when the dialog should close
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        let before = self.draft.scale;
        match key {
            KeyCode::Left | KeyCode::Char('-') => self.draft.scale_down(),
            KeyCode::Right | KeyCode::Char('+') => self.draft.scale_up(),
            KeyCode::Esc | KeyCode::Enter => return true,
            _ => {}
        }
        self.changed |= self.draft.scale != before;
        false
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = dialog_block("Preferences");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let (body, footer) = body_and_footer(inner);

        let lines = vec![
            Line::from(vec![
                Span::raw("Scale: "),
                Span::styled(
                    format!("◄ {} ►", self.draft.scale),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!("Saves: {}", self.draft.save_store_path().display()),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), body);
        frame.render_widget(
            Paragraph::new(Line::styled("[←→] Scale  [Esc] Done", help_style())),
            footer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::preferences::{MAX_SCALE, MIN_SCALE};

    #[test]
    fn test_scale_stays_in_bounds() {
        let mut dialog = PreferencesDialog::new(&Preferences::default());
        for _ in 0..20 {
            dialog.handle_key(KeyCode::Right);
        }
        assert_eq!(dialog.draft().scale, MAX_SCALE);
        for _ in 0..20 {
            dialog.handle_key(KeyCode::Left);
        }
        assert_eq!(dialog.draft().scale, MIN_SCALE);
        assert!(dialog.changed());
    }

    #[test]
    fn test_untouched_is_unchanged() {
        let mut dialog = PreferencesDialog::new(&Preferences::default());
        assert!(dialog.handle_key(KeyCode::Esc));
        assert!(!dialog.changed());
    }
}
