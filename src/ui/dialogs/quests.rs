//! Quest log

use crossterm::event::KeyCode;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

use super::{body_and_footer, dialog_block, help_style};
use crate::engine::EngineHandle;
use crate::items::QuestDescriptor;
use crate::ui::widgets::{PickerWidget, SelectionList};

pub struct QuestLog {
    list: SelectionList<QuestDescriptor>,
}

impl QuestLog {
    pub fn open(engine: &EngineHandle) -> Self {
        let quests = engine.borrow().quests();
        log::debug!("Quest log with {} quests", quests.len());
        Self {
            list: SelectionList::from_items(quests),
        }
    }

    pub fn list(&self) -> &SelectionList<QuestDescriptor> {
        &self.list
    }

    /// True when the log should close
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(),
            KeyCode::Esc | KeyCode::Enter => return true,
            _ => {}
        }
        false
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = dialog_block("Quests");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let (body, footer) = body_and_footer(inner);

        frame.render_widget(PickerWidget::new(&self.list), body);
        frame.render_widget(
            Paragraph::new(Line::styled("[↑↓] Select  [Esc] Done", help_style())),
            footer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;

    #[test]
    fn test_lists_engine_quests() {
        let mut mock = MockEngine::accepting();
        mock.quests = vec![
            QuestDescriptor { name: "Find the ring".to_string() },
            QuestDescriptor { name: "Slay the rat king".to_string() },
        ];
        let (_mock, engine) = mock.shared();

        let mut quest_log = QuestLog::open(&engine);
        assert_eq!(quest_log.list().names(), vec!["Find the ring", "Slay the rat king"]);
        assert!(!quest_log.handle_key(KeyCode::Down));
        assert_eq!(quest_log.list().selected_index(), Some(1));
        assert!(quest_log.handle_key(KeyCode::Esc));
    }

    #[test]
    fn test_no_quests() {
        let (_mock, engine) = MockEngine::accepting().shared();
        let quest_log = QuestLog::open(&engine);
        assert!(quest_log.list().is_empty());
        assert_eq!(quest_log.list().selected_index(), None);
    }
}
