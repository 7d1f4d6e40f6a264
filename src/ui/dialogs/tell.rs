//! Narrative prompt with lettered answers

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{body_and_footer, dialog_block, help_style};
use crate::engine::{ActorId, Task, Tell};

const CHOICE_KEYS: [char; 3] = ['a', 'b', 'c'];

#[derive(Debug, Clone, PartialEq)]
pub enum TellOutcome {
    Stay,
    /// Close without answering
    Dismiss,
    /// Close, then send the answer once the dialog is gone
    Answer(Task),
}

#[derive(Debug, Clone)]
pub struct TellDialog {
    tell: Tell,
}

impl TellDialog {
    pub fn new(tell: Tell) -> Self {
        Self { tell }
    }

    pub fn from_actor(&self) -> ActorId {
        self.tell.from
    }

    /// Message split on `&`
    pub fn lines(&self) -> Vec<&str> {
        self.tell.message.split('&').collect()
    }

    /// Only the first three choices are offered
    pub fn choices(&self) -> &[String] {
        let n = self.tell.choices.len().min(CHOICE_KEYS.len());
        &self.tell.choices[..n]
    }

    pub fn choose(&self, choice: usize) -> Option<Task> {
        (choice < self.choices().len()).then_some(Task::Respond {
            actor: self.tell.from,
            choice,
        })
    }

    pub fn handle_key(&self, key: KeyCode) -> TellOutcome {
        match key {
            KeyCode::Char(c) => {
                let lower = c.to_ascii_lowercase();
                let Some(choice) = CHOICE_KEYS.iter().position(|&k| k == lower) else {
                    return TellOutcome::Stay;
                };
                match self.choose(choice) {
                    Some(task) => TellOutcome::Answer(task),
                    None => TellOutcome::Stay,
                }
            }
            // A prompt without answers is just a message
            KeyCode::Esc | KeyCode::Enter if self.choices().is_empty() => TellOutcome::Dismiss,
            _ => TellOutcome::Stay,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = dialog_block(&self.tell.title);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let (body, footer) = body_and_footer(inner);

        let mut lines: Vec<Line> = self.lines().into_iter().map(|l| Line::from(l.trim())).collect();
        lines.push(Line::from(""));
        for (i, choice) in self.choices().iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", CHOICE_KEYS[i].to_ascii_uppercase()),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(choice.as_str()),
            ]));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);

        let help = if self.choices().is_empty() {
            "[Enter] OK"
        } else {
            "[A/B/C] Answer"
        };
        frame.render_widget(Paragraph::new(Line::styled(help, help_style())), footer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tell(choices: &[&str]) -> Tell {
        Tell {
            title: "Old Man".to_string(),
            message: "Hello traveler.&Will you help?".to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            from: 7,
        }
    }

    #[test]
    fn test_ampersand_breaks_lines() {
        let dialog = TellDialog::new(tell(&[]));
        assert_eq!(dialog.lines(), vec!["Hello traveler.", "Will you help?"]);
    }

    #[test]
    fn test_answer_targets_teller() {
        let dialog = TellDialog::new(tell(&["Yes", "No"]));
        assert_eq!(
            dialog.handle_key(KeyCode::Char('B')),
            TellOutcome::Answer(Task::Respond { actor: 7, choice: 1 })
        );
    }

    #[test]
    fn test_missing_choice_is_ignored() {
        let dialog = TellDialog::new(tell(&["Yes", "No"]));
        assert_eq!(dialog.handle_key(KeyCode::Char('c')), TellOutcome::Stay);
        assert_eq!(dialog.handle_key(KeyCode::Esc), TellOutcome::Stay);
    }

    #[test]
    fn test_extra_choices_are_dropped() {
        let dialog = TellDialog::new(tell(&["1", "2", "3", "4"]));
        assert_eq!(dialog.choices().len(), 3);
        assert_eq!(dialog.choose(3), None);
    }

    #[test]
    fn test_message_only_dismisses() {
        let dialog = TellDialog::new(tell(&[]));
        assert_eq!(dialog.handle_key(KeyCode::Enter), TellOutcome::Dismiss);
    }
}
