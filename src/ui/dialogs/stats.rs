//! Read-only character sheet

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{body_and_footer, dialog_block, help_style};
use crate::engine::{PlayerStats, StatKind};

#[derive(Debug, Clone)]
pub struct StatsSheet {
    stats: PlayerStats,
}

impl StatsSheet {
    pub fn new(stats: PlayerStats) -> Self {
        Self { stats }
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Level with a `+` when enough experience has been earned for the next
    pub fn level_label(&self) -> String {
        if self.stats.can_level_up {
            format!("{}+", self.stats.level)
        } else {
            self.stats.level.to_string()
        }
    }

    /// True when the sheet should close
    pub fn handle_key(&self, key: KeyCode) -> bool {
        matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q'))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = dialog_block("Stats");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let (body, footer) = body_and_footer(inner);

        let s = &self.stats;
        let label = Style::default().fg(Color::Gray);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let pair = |name: &str, text: String| {
            Line::from(vec![
                Span::styled(format!("{:<8}", name), label),
                Span::styled(text, value),
            ])
        };

        let mut lines = vec![
            pair("Name", s.name.clone()),
            pair("Class", s.class.clone()),
            pair("Race", s.race.clone()),
            pair("Level", self.level_label()),
            pair("Exp", s.exp.to_string()),
            Line::from(""),
            pair("HP", format!("{}/{}", s.hp.0, s.hp.1)),
            pair("MP", format!("{}/{}", s.mp.0, s.mp.1)),
            pair("AC", s.ac.to_string()),
            pair("GP", s.gp.to_string()),
            Line::from(""),
        ];
        for kind in StatKind::ALL {
            lines.push(pair(kind.label(), s.stats.get(kind).to_string()));
        }

        frame.render_widget(Paragraph::new(lines), body);
        frame.render_widget(Paragraph::new(Line::styled("[Esc] Done", help_style())), footer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StatBlock;
    use ratatui::{backend::TestBackend, Terminal};

    fn player(can_level_up: bool) -> PlayerStats {
        PlayerStats {
            name: "Hero".to_string(),
            class: "Fighter".to_string(),
            race: "Human".to_string(),
            level: 3,
            can_level_up,
            hp: (12, 20),
            mp: (0, 0),
            ac: 5,
            exp: 900,
            gp: 42,
            stats: StatBlock { str: 14, dex: 9, vit: 12, int: 8, wis: 8, luck: 9 },
        }
    }

    #[test]
    fn test_level_marker() {
        assert_eq!(StatsSheet::new(player(false)).level_label(), "3");
        assert_eq!(StatsSheet::new(player(true)).level_label(), "3+");
    }

    #[test]
    fn test_renders_values() {
        let sheet = StatsSheet::new(player(true));
        let mut terminal = Terminal::new(TestBackend::new(40, 24)).unwrap();
        terminal.draw(|f| sheet.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Fighter"));
        assert!(text.contains("3+"));
        assert!(text.contains("12/20"));
    }

    #[test]
    fn test_closes_on_escape() {
        let sheet = StatsSheet::new(player(false));
        assert!(sheet.handle_key(KeyCode::Esc));
        assert!(!sheet.handle_key(KeyCode::Down));
    }
}
