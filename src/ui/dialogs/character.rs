//! Character creation
//!
//! Point-buy over the race's starting stats. Changing race resets stats and
//! points; portraits wrap in both directions.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{body_and_footer, dialog_block, help_style};
use crate::engine::{NewCharacter, Race, StatBlock, StatKind};

/// Points to spend on a fresh sheet
pub const STARTING_POINTS: i32 = 12;

pub const MAX_NAME_LEN: usize = 14;

/// Portrait ids the player can choose from
pub const USER_PORTRAITS: [u32; 16] = [
    600, 601, 602, 603, 604, 605, 606, 607, 650, 651, 652, 653, 654, 655, 656, 657,
];

/// Cursor rows of the sheet, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterRow {
    Name,
    Race,
    Portrait,
    Stat(StatKind),
    Done,
}

impl CharacterRow {
    fn all() -> Vec<CharacterRow> {
        let mut rows = vec![CharacterRow::Name, CharacterRow::Race, CharacterRow::Portrait];
        rows.extend(StatKind::ALL.iter().map(|&k| CharacterRow::Stat(k)));
        rows.push(CharacterRow::Done);
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterOutcome {
    Stay,
    Cancel,
    /// Sheet finished; hand it to the engine
    Done(NewCharacter),
}

#[derive(Debug, Clone)]
pub struct CharacterCreation {
    name: String,
    race_index: usize,
    portrait_index: usize,
    stats: StatBlock,
    points: i32,
    cursor: usize,
}

impl Default for CharacterCreation {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterCreation {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            race_index: 0,
            portrait_index: 0,
            stats: Race::ALL[0].default_stats(),
            points: STARTING_POINTS,
            cursor: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn race(&self) -> Race {
        Race::ALL[self.race_index]
    }

    pub fn portrait(&self) -> u32 {
        USER_PORTRAITS[self.portrait_index]
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn row(&self) -> CharacterRow {
        CharacterRow::all()[self.cursor]
    }

    pub fn push_char(&mut self, c: char) {
        if self.name.chars().count() < MAX_NAME_LEN {
            self.name.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.name.pop();
    }

    /// Next race; stats and points go back to that race's defaults
    pub fn next_race(&mut self) {
        self.race_index = (self.race_index + 1) % Race::ALL.len();
        self.stats = self.race().default_stats();
        self.points = STARTING_POINTS;
    }

    pub fn next_portrait(&mut self, backwards: bool) {
        let len = USER_PORTRAITS.len();
        self.portrait_index = if backwards {
            (self.portrait_index + len - 1) % len
        } else {
            (self.portrait_index + 1) % len
        };
    }

    /// Spend a point. No-op at the race maximum or with no points left.
    pub fn increment(&mut self, kind: StatKind) {
        let (_, max) = self.race().bounds(kind);
        let value = self.stats.get_mut(kind);
        if *value >= max {
            *value = max;
            return;
        }
        if self.points <= 0 {
            self.points = 0;
            return;
        }
        self.points -= 1;
        *value += 1;
    }

    /// Refund a point. No-op at the race minimum.
    pub fn decrement(&mut self, kind: StatKind) {
        let (min, _) = self.race().bounds(kind);
        let value = self.stats.get_mut(kind);
        if *value <= min {
            *value = min;
            return;
        }
        *value -= 1;
        self.points += 1;
    }

    pub fn finish(&self) -> NewCharacter {
        NewCharacter {
            name: self.name.clone(),
            race: self.race(),
            portrait: self.portrait(),
            stats: self.stats,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> CharacterOutcome {
        let rows = CharacterRow::all().len();
        match key {
            KeyCode::Esc => return CharacterOutcome::Cancel,
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => self.cursor = (self.cursor + 1).min(rows - 1),
            KeyCode::Enter if self.row() == CharacterRow::Done => {
                log::info!("Character created: {} the {}", self.name, self.race().name());
                return CharacterOutcome::Done(self.finish());
            }
            KeyCode::Enter => self.cursor = (self.cursor + 1).min(rows - 1),
            KeyCode::Left | KeyCode::Right => {
                let forward = key == KeyCode::Right;
                match self.row() {
                    CharacterRow::Race => self.next_race(),
                    CharacterRow::Portrait => self.next_portrait(!forward),
                    CharacterRow::Stat(kind) if forward => self.increment(kind),
                    CharacterRow::Stat(kind) => self.decrement(kind),
                    CharacterRow::Name | CharacterRow::Done => {}
                }
            }
            KeyCode::Char(c) if self.row() == CharacterRow::Name => self.push_char(c),
            KeyCode::Backspace if self.row() == CharacterRow::Name => self.pop_char(),
            KeyCode::Char('+') => {
                if let CharacterRow::Stat(kind) = self.row() {
                    self.increment(kind);
                }
            }
            KeyCode::Char('-') => {
                if let CharacterRow::Stat(kind) = self.row() {
                    self.decrement(kind);
                }
            }
            _ => {}
        }
        CharacterOutcome::Stay
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = dialog_block("Character Creation");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let (body, footer) = body_and_footer(inner);

        let current = self.row();
        let marker = |row: CharacterRow| if row == current { "► " } else { "  " };
        let style = |row: CharacterRow| {
            if row == current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            }
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{}Name: {}", marker(CharacterRow::Name), self.name),
                style(CharacterRow::Name),
            )),
            Line::from(Span::styled(
                format!("{}Race: {}", marker(CharacterRow::Race), self.race().name()),
                style(CharacterRow::Race),
            )),
            Line::from(Span::styled(
                format!("{}Portrait: #{}", marker(CharacterRow::Portrait), self.portrait()),
                style(CharacterRow::Portrait),
            )),
            Line::from(""),
        ];
        for kind in StatKind::ALL {
            let row = CharacterRow::Stat(kind);
            let (min, max) = self.race().bounds(kind);
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}{:<5}{:>3}", marker(row), kind.label(), self.stats.get(kind)),
                    style(row),
                ),
                Span::styled(format!("  ({}-{})", min, max), help_style()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!("  Points: {}", self.points)));
        lines.push(Line::from(Span::styled(
            format!("{}[ Done ]", marker(CharacterRow::Done)),
            style(CharacterRow::Done),
        )));

        frame.render_widget(Paragraph::new(lines), body);
        frame.render_widget(
            Paragraph::new(Line::styled(
                "[↑↓] Row  [←→] Change  [Enter] Next/Done  [Esc] Cancel",
                help_style(),
            )),
            footer,
        );
    }
}
