//! Picker widget for ratatui
//!
//! Draws a `SelectionList` as a scrolling table with an optional info panel.
//! Nothing here holds state: the selected row comes from the model.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use super::selection::SelectionList;
use crate::items::Listable;

const BORDER: Color = Color::Rgb(44, 0, 139);

/// Widget for rendering a selection list
pub struct PickerWidget<'a, T> {
    list: &'a SelectionList<T>,
    title: &'a str,
    show_info: bool,
    gold: Option<i64>,
}

impl<'a, T: Listable> PickerWidget<'a, T> {
    pub fn new(list: &'a SelectionList<T>) -> Self {
        Self {
            list,
            title: "",
            show_info: false,
            gold: None,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Show the restriction line above and the info panel below the table
    pub fn item_info(mut self, show: bool) -> Self {
        self.show_info = show;
        self
    }

    /// Gold line in the info panel
    pub fn gold(mut self, gold: Option<i64>) -> Self {
        self.gold = gold;
        self
    }

    /// First visible row so the selection stays on screen
    fn scroll_offset(&self, rows: usize) -> usize {
        match self.list.selected_index() {
            Some(i) if rows > 0 && i >= rows => i + 1 - rows,
            _ => 0,
        }
    }

    /// The transient message wins over the item's restriction
    fn status_line(&self) -> Option<String> {
        if let Some(message) = self.list.message() {
            return Some(message.to_string());
        }
        self.list
            .selected()
            .and_then(|item| item.restriction_text())
            .map(str::to_string)
    }
}

impl<'a, T: Listable> Widget for PickerWidget<'a, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut inner = area;

        if self.show_info && inner.height > 0 {
            if let Some(status) = self.status_line() {
                buf.set_stringn(
                    inner.x,
                    inner.y,
                    &status,
                    inner.width as usize,
                    Style::default().fg(Color::Yellow),
                );
            }
            inner.y += 1;
            inner.height -= 1;
        }

        // Info panel takes the bottom three rows when enabled
        let info_rows = if self.show_info { 3.min(inner.height) } else { 0 };
        let table_area = Rect {
            height: inner.height - info_rows,
            ..inner
        };

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER));
        let rows_area = block.inner(table_area);
        block.render(table_area, buf);

        let rows = rows_area.height as usize;
        let offset = self.scroll_offset(rows);
        let selected = self.list.selected_index();

        for (row, index) in (offset..self.list.len()).take(rows).enumerate() {
            let Some(label) = self.list.name_of(index) else {
                continue;
            };
            let style = if Some(index) == selected {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Black)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let y = rows_area.y + row as u16;
            // Fill the whole row so the highlight reads as a bar
            for x in rows_area.x..rows_area.x + rows_area.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(' ').set_style(style);
                }
            }
            buf.set_stringn(rows_area.x, y, &label, rows_area.width as usize, style);
        }

        if info_rows == 0 {
            return;
        }
        let mut y = table_area.y + table_area.height;
        let bottom = inner.y + inner.height;
        if let Some(info) = self.list.selected().and_then(|item| item.info_text()) {
            if y < bottom {
                buf.set_stringn(inner.x, y, info, inner.width as usize, Style::default());
                y += 1;
            }
        }
        if let Some(gold) = self.gold {
            if y < bottom {
                let text = format!("Gold: {}", gold);
                buf.set_stringn(
                    inner.x,
                    y,
                    &text,
                    inner.width as usize,
                    Style::default().fg(Color::Yellow),
                );
            }
        }
    }
}
