//! Save, load, delete and export menus

use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

use super::{body_and_footer, dialog_block, help_style};
use crate::game::Session;
use crate::save::{SaveEntry, SlotRef, StoreBackend};
use crate::ui::widgets::{PickerWidget, SelectionList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMenuKind {
    Save,
    Load,
    Delete,
    Export,
}

impl SaveMenuKind {
    pub fn title(&self) -> &'static str {
        match self {
            SaveMenuKind::Save => "Save Game",
            SaveMenuKind::Load => "Load Game",
            SaveMenuKind::Delete => "Delete Game",
            SaveMenuKind::Export => "Export Game",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            SaveMenuKind::Save => "Save",
            SaveMenuKind::Load => "Load",
            SaveMenuKind::Delete => "Delete",
            SaveMenuKind::Export => "Export",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMenuOutcome {
    Stay,
    Close,
}

/// A picker over the save store
pub struct SaveMenu {
    kind: SaveMenuKind,
    list: SelectionList<SaveEntry>,
    /// Where exports go
    export_dir: PathBuf,
    /// Path being typed for an import; `Some` while the prompt is open
    import_path: Option<String>,
}

impl SaveMenu {
    /// Save lists every slot newest first; the others list only slots that
    /// hold a game, quicksave first.
    pub fn open<B: StoreBackend>(kind: SaveMenuKind, session: &Session<B>, export_dir: PathBuf) -> Self {
        let entries = match kind {
            SaveMenuKind::Save => session.store().display_order(),
            _ => session.store().candidates(),
        };
        log::info!("Opening {:?} menu with {} entries", kind, entries.len());
        Self {
            kind,
            list: SelectionList::from_items(entries),
            export_dir,
            import_path: None,
        }
    }

    pub fn kind(&self) -> SaveMenuKind {
        self.kind
    }

    pub fn list(&self) -> &SelectionList<SaveEntry> {
        &self.list
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn is_importing(&self) -> bool {
        self.import_path.is_some()
    }

    pub fn handle_key<B: StoreBackend>(&mut self, key: KeyCode, session: &mut Session<B>) -> SaveMenuOutcome {
        if let Some(path) = self.import_path.as_mut() {
            match key {
                KeyCode::Char(c) => path.push(c),
                KeyCode::Backspace => {
                    path.pop();
                }
                KeyCode::Esc => self.import_path = None,
                KeyCode::Enter => {
                    let path = self.import_path.take().unwrap_or_default();
                    return self.import(Path::new(path.trim()), session);
                }
                _ => {}
            }
            return SaveMenuOutcome::Stay;
        }

        match key {
            KeyCode::Esc => SaveMenuOutcome::Close,
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.select_prev();
                SaveMenuOutcome::Stay
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.select_next();
                SaveMenuOutcome::Stay
            }
            KeyCode::Char('f') if self.kind == SaveMenuKind::Load => {
                self.import_path = Some(String::new());
                SaveMenuOutcome::Stay
            }
            KeyCode::Enter => self.activate(session),
            _ => SaveMenuOutcome::Stay,
        }
    }

    /// Run the menu's verb on the selected entry
    pub fn activate<B: StoreBackend>(&mut self, session: &mut Session<B>) -> SaveMenuOutcome {
        let Some(entry) = self.list.selected().cloned() else {
            return SaveMenuOutcome::Stay;
        };
        match self.kind {
            SaveMenuKind::Save => {
                let SlotRef::Regular(index) = entry.slot else {
                    return SaveMenuOutcome::Stay;
                };
                match session.save_to_slot(index) {
                    Ok(()) => SaveMenuOutcome::Close,
                    Err(e) => self.fail(&e.to_string()),
                }
            }
            SaveMenuKind::Load => match session.load(&entry) {
                Ok(true) => SaveMenuOutcome::Close,
                Ok(false) => self.fail("Can't load this save."),
                Err(e) => self.fail(&e.to_string()),
            },
            SaveMenuKind::Delete => match session.delete(&entry) {
                Ok(_) => {
                    self.list.remove_selected();
                    if self.list.is_empty() {
                        SaveMenuOutcome::Close
                    } else {
                        SaveMenuOutcome::Stay
                    }
                }
                Err(e) => self.fail(&e.to_string()),
            },
            SaveMenuKind::Export => match session.export(&entry, &self.export_dir) {
                Ok(path) => {
                    log::info!("Exported save to {:?}", path);
                    SaveMenuOutcome::Close
                }
                Err(e) => self.fail(&e.to_string()),
            },
        }
    }

    fn import<B: StoreBackend>(&mut self, path: &Path, session: &mut Session<B>) -> SaveMenuOutcome {
        match session.import(path) {
            Ok(true) => SaveMenuOutcome::Close,
            Ok(false) => self.fail("Can't load this save."),
            Err(e) => self.fail(&e.to_string()),
        }
    }

    fn fail(&mut self, message: &str) -> SaveMenuOutcome {
        log::warn!("{} failed: {}", self.kind.verb(), message);
        self.list.refresh(Some(message));
        SaveMenuOutcome::Stay
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = dialog_block(self.kind.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (body, footer) = body_and_footer(inner);
        frame.render_widget(PickerWidget::new(&self.list).item_info(true), body);

        let help = match &self.import_path {
            Some(path) => format!("Path: {}_  [Enter] Load  [Esc] Cancel", path),
            None if self.kind == SaveMenuKind::Load => {
                "[↑↓] Select  [Enter] Load  [f] From File  [Esc] Done".to_string()
            }
            None => format!("[↑↓] Select  [Enter] {}  [Esc] Done", self.kind.verb()),
        };
        frame.render_widget(Paragraph::new(Line::styled(help, help_style())), footer);
    }
}
