//! Dialog host
//!
//! Owns the single open dialog, routes keys to it, and services engine
//! requests from the deferred queue. Engine calls made on behalf of a dialog
//! may post new requests; those are only acted on by `pump`, which the
//! embedding loop calls between events, never from inside an engine call.

use std::path::PathBuf;

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Clear, Paragraph},
    Frame,
};

use super::dialogs::{
    body_and_footer, centered_rect, dialog_block, help_style, CharacterCreation,
    CharacterOutcome, PreferencesDialog, QuestLog, SaveMenu, SaveMenuKind, SaveMenuOutcome,
    StatsSheet, TellDialog, TellOutcome,
};
use super::transaction::{ActionSet, Outcome, TransactionController};
use super::widgets::PickerWidget;
use crate::engine::{ActorId, DialogRequest, Task};
use crate::game::{DeferredQueue, Poster, Session};
use crate::items::TradeKind;
use crate::save::StoreBackend;

/// Entries of the game menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    NewCharacter,
    QuickSave,
    Save,
    Load,
    Delete,
    Export,
    Stats,
    Quests,
    Preferences,
}

impl MenuCommand {
    /// Needs a game in progress
    fn needs_game(&self) -> bool {
        matches!(
            self,
            MenuCommand::QuickSave
                | MenuCommand::Save
                | MenuCommand::Stats
                | MenuCommand::Quests
        )
    }
}

/// Whatever dialog is currently up
pub enum OpenDialog {
    Transaction(TransactionController),
    SaveMenu(SaveMenu),
    Character(CharacterCreation),
    Stats(StatsSheet),
    Tell(TellDialog),
    Quests(QuestLog),
    Preferences(PreferencesDialog),
}

impl OpenDialog {
    pub fn kind(&self) -> &'static str {
        match self {
            OpenDialog::Transaction(_) => "transaction",
            OpenDialog::SaveMenu(_) => "save-menu",
            OpenDialog::Character(_) => "character",
            OpenDialog::Stats(_) => "stats",
            OpenDialog::Tell(_) => "tell",
            OpenDialog::Quests(_) => "quests",
            OpenDialog::Preferences(_) => "preferences",
        }
    }
}

pub struct DialogHost<B> {
    session: Session<B>,
    queue: DeferredQueue<Task>,
    dialog: Option<OpenDialog>,
    /// Actor used for requests that do not name one (spellbook, buttons)
    player: ActorId,
    export_dir: PathBuf,
}

impl<B: StoreBackend> DialogHost<B> {
    /// `queue` must be the queue whose poster the engine was built with
    pub fn new(session: Session<B>, queue: DeferredQueue<Task>, player: ActorId) -> Self {
        Self {
            session,
            queue,
            dialog: None,
            player,
            export_dir: PathBuf::from("."),
        }
    }

    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<B> {
        &mut self.session
    }

    pub fn poster(&self) -> Poster<Task> {
        self.queue.poster()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn dialog(&self) -> Option<&OpenDialog> {
        self.dialog.as_ref()
    }

    /// Run every queued task, including ones posted while pumping. Call only
    /// between events, with no engine call on the stack.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Some(task) = self.queue.pop() {
            self.run(task);
            count += 1;
        }
        if count > 0 {
            log::debug!("Pumped {} task(s)", count);
        }
        count
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Open(request) => self.open_request(request),
            Task::Respond { actor, choice } => {
                log::debug!("Response {} to actor {}", choice, actor);
                self.session.engine().borrow_mut().send_response(actor, choice);
            }
        }
    }

    fn open_request(&mut self, request: DialogRequest) {
        let engine = self.session.engine().clone();
        let label = request.kind();
        let dialog = match request {
            DialogRequest::Inventory { actor, items } => {
                OpenDialog::Transaction(TransactionController::inventory(engine, actor, items))
            }
            DialogRequest::Trade { actor, items, kind } => {
                OpenDialog::Transaction(TransactionController::trade(engine, actor, items, kind))
            }
            DialogRequest::Pickup { actor, items } => {
                OpenDialog::Transaction(TransactionController::pickup(engine, actor, items))
            }
            DialogRequest::PickButton { button_index, buttons } => OpenDialog::Transaction(
                TransactionController::button_picker(engine, self.player, button_index, buttons),
            ),
            DialogRequest::Spellbook { spells } => OpenDialog::Transaction(
                TransactionController::spellbook(engine, self.player, &spells),
            ),
            DialogRequest::Stats(stats) => OpenDialog::Stats(StatsSheet::new(stats)),
            DialogRequest::Tell(tell) => OpenDialog::Tell(TellDialog::new(tell)),
        };
        self.show(dialog, label);
    }

    fn show(&mut self, dialog: OpenDialog, kind: &str) {
        if let Some(previous) = &self.dialog {
            log::info!("Replacing {} dialog with {}", previous.kind(), kind);
        } else {
            log::info!("Opening {} dialog", kind);
        }
        self.dialog = Some(dialog);
    }

    pub fn close(&mut self) {
        if let Some(dialog) = self.dialog.take() {
            log::info!("Closed {} dialog", dialog.kind());
        }
    }

    /// Game-menu entry. Ignored while a dialog is open.
    pub fn open_menu(&mut self, command: MenuCommand) {
        if self.is_open() {
            log::debug!("Menu {:?} ignored, dialog open", command);
            return;
        }
        if command.needs_game() && !self.session.engine().borrow().playing() {
            log::debug!("Menu {:?} needs a game in progress", command);
            return;
        }

        let dialog = match command {
            MenuCommand::QuickSave => {
                if let Err(e) = self.session.quicksave() {
                    log::warn!("Quicksave failed: {}", e);
                }
                return;
            }
            MenuCommand::Stats => {
                // The engine answers with a Stats request
                self.session.engine().borrow_mut().show_stats(self.player);
                return;
            }
            MenuCommand::Save | MenuCommand::Load | MenuCommand::Delete | MenuCommand::Export => {
                OpenDialog::SaveMenu(SaveMenu::open(
                    SaveMenuKind::from(command),
                    &self.session,
                    self.export_dir.clone(),
                ))
            }
            MenuCommand::NewCharacter => OpenDialog::Character(CharacterCreation::new()),
            MenuCommand::Quests => OpenDialog::Quests(QuestLog::open(self.session.engine())),
            MenuCommand::Preferences => {
                OpenDialog::Preferences(PreferencesDialog::new(self.session.preferences()))
            }
        };
        let kind = dialog.kind();
        self.show(dialog, kind);
    }

    /// Route a key to the open dialog. Returns false when no dialog is open,
    /// meaning the key belongs to the world.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        let Some(dialog) = self.dialog.as_mut() else {
            return false;
        };

        let mut close = false;
        let mut after_close: Option<Task> = None;
        match dialog {
            OpenDialog::Transaction(controller) => {
                close = Self::transaction_key(controller, key);
            }
            OpenDialog::SaveMenu(menu) => {
                close = menu.handle_key(key, &mut self.session) == SaveMenuOutcome::Close;
            }
            OpenDialog::Character(sheet) => match sheet.handle_key(key) {
                CharacterOutcome::Stay => {}
                CharacterOutcome::Cancel => close = true,
                CharacterOutcome::Done(character) => {
                    self.session.engine().borrow_mut().new_game(&character);
                    close = true;
                }
            },
            OpenDialog::Stats(sheet) => close = sheet.handle_key(key),
            OpenDialog::Tell(tell) => match tell.handle_key(key) {
                TellOutcome::Stay => {}
                TellOutcome::Dismiss => close = true,
                TellOutcome::Answer(task) => {
                    close = true;
                    after_close = Some(task);
                }
            },
            OpenDialog::Quests(quests) => close = quests.handle_key(key),
            OpenDialog::Preferences(prefs) => {
                if prefs.handle_key(key) {
                    if prefs.changed() {
                        *self.session.preferences_mut() = prefs.draft().clone();
                        if let Err(e) = self.session.persist_preferences() {
                            log::warn!("Failed to save preferences: {}", e);
                        }
                    }
                    close = true;
                }
            }
        }

        if close {
            self.close();
        }
        if let Some(task) = after_close {
            self.queue.poster().post(task);
        }
        true
    }

    /// Returns true when the controller is done
    fn transaction_key(controller: &mut TransactionController, key: KeyCode) -> bool {
        match key {
            KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => controller.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => controller.select_next(),
            KeyCode::Char('t') if controller.actions() == ActionSet::Inventory => {
                // The sheet arrives through the queue
                controller.request_stats();
            }
            KeyCode::Char(c) => {
                let Some(button) = controller.buttons().into_iter().find(|b| b.key == c) else {
                    return false;
                };
                return controller.trigger(button.action) == Outcome::Closed;
            }
            _ => {}
        }
        false
    }

    pub fn render(&self, frame: &mut Frame) {
        let Some(dialog) = &self.dialog else {
            return;
        };
        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);

        match dialog {
            OpenDialog::Transaction(controller) => render_transaction(controller, frame, area),
            OpenDialog::SaveMenu(menu) => menu.render(frame, area),
            OpenDialog::Character(sheet) => sheet.render(frame, area),
            OpenDialog::Stats(sheet) => sheet.render(frame, area),
            OpenDialog::Tell(tell) => tell.render(frame, area),
            OpenDialog::Quests(quests) => quests.render(frame, area),
            OpenDialog::Preferences(prefs) => prefs.render(frame, area),
        }
    }
}

impl From<MenuCommand> for SaveMenuKind {
    fn from(command: MenuCommand) -> Self {
        match command {
            MenuCommand::Load => SaveMenuKind::Load,
            MenuCommand::Delete => SaveMenuKind::Delete,
            MenuCommand::Export => SaveMenuKind::Export,
            _ => SaveMenuKind::Save,
        }
    }
}

fn transaction_title(actions: ActionSet) -> &'static str {
    match actions {
        ActionSet::Inventory => "Inventory",
        ActionSet::Trade(TradeKind::Buy) => "Buy",
        ActionSet::Trade(TradeKind::Sell) => "Sell",
        ActionSet::Pickup => "Pickup",
        ActionSet::Spellbook => "Spellbook",
        ActionSet::ButtonPicker { .. } => "Set Button",
    }
}

fn render_transaction(controller: &TransactionController, frame: &mut Frame, area: Rect) {
    let block = dialog_block(transaction_title(controller.actions()));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let (body, footer) = body_and_footer(inner);

    frame.render_widget(
        PickerWidget::new(controller.list())
            .item_info(controller.shows_info())
            .gold(controller.gold()),
        body,
    );

    let mut help: Vec<String> = controller
        .buttons()
        .iter()
        .map(|b| format!("[{}] {}", b.key, b.label))
        .collect();
    if controller.actions() == ActionSet::Inventory {
        help.push("[t] Stats".to_string());
    }
    help.push("[Esc] Done".to_string());
    frame.render_widget(Paragraph::new(Line::styled(help.join("  "), help_style())), footer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use crate::engine::{PlayerStats, StatBlock, Tell};
    use crate::items::ItemRecord;
    use crate::save::{MemoryBackend, SaveStore};
    use ratatui::{backend::TestBackend, Terminal};
    use std::cell::RefCell;
    use std::rc::Rc;

    const PLAYER: ActorId = 1;

    fn host_with(mock: MockEngine) -> (Rc<RefCell<MockEngine>>, DialogHost<MemoryBackend>) {
        let queue = DeferredQueue::new();
        let mut mock = mock;
        mock.poster = Some(queue.poster());
        let (typed, handle) = mock.shared();
        let session = Session::new(handle, SaveStore::new(MemoryBackend::new()));
        (typed, DialogHost::new(session, queue, PLAYER))
    }

    fn items(names: &[&str]) -> Vec<ItemRecord> {
        names.iter().map(|n| ItemRecord::new(*n)).collect()
    }

    fn stats() -> PlayerStats {
        PlayerStats {
            name: "Hero".to_string(),
            class: "Fighter".to_string(),
            race: "Human".to_string(),
            level: 1,
            can_level_up: false,
            hp: (10, 10),
            mp: (0, 0),
            ac: 9,
            exp: 0,
            gp: 0,
            stats: StatBlock::default(),
        }
    }

    #[test]
    fn test_requests_open_only_when_pumped() {
        let (_mock, mut host) = host_with(MockEngine::accepting());
        host.poster().post(Task::Open(DialogRequest::Inventory {
            actor: PLAYER,
            items: items(&["Sword"]),
        }));
        assert!(!host.is_open());

        assert_eq!(host.pump(), 1);
        assert!(matches!(host.dialog(), Some(OpenDialog::Transaction(_))));
    }

    #[test]
    fn test_request_from_inside_engine_call_is_deferred() {
        let mut mock = MockEngine::accepting();
        mock.pending_request = Some(DialogRequest::Inventory {
            actor: PLAYER,
            items: items(&["Apple"]),
        });
        let (mock, mut host) = host_with(mock);
        host.poster().post(Task::Open(DialogRequest::Pickup {
            actor: 3,
            items: items(&["Apple"]),
        }));
        host.pump();

        // Picking up the only item closes the pickup dialog; the engine asked
        // for the inventory while that call was on the stack.
        assert!(host.handle_key(KeyCode::Char('p')));
        assert!(!host.is_open());
        assert_eq!(host.pending(), 1);
        assert_eq!(mock.borrow().reentrant.get(), 0);

        host.pump();
        let Some(OpenDialog::Transaction(controller)) = host.dialog() else {
            panic!("inventory should be open");
        };
        assert_eq!(controller.actions(), ActionSet::Inventory);
        assert_eq!(mock.borrow().calls, vec!["pickup:0"]);
    }

    #[test]
    fn test_tell_closes_before_answer_is_sent() {
        let (mock, mut host) = host_with(MockEngine::accepting());
        host.poster().post(Task::Open(DialogRequest::Tell(Tell {
            title: "Guard".to_string(),
            message: "Halt!".to_string(),
            choices: vec!["Yes".to_string(), "No".to_string()],
            from: 9,
        })));
        host.pump();

        assert!(host.handle_key(KeyCode::Char('b')));
        assert!(!host.is_open());
        assert!(mock.borrow().responses.is_empty());

        host.pump();
        assert_eq!(mock.borrow().responses, vec![(9, 1)]);
    }

    #[test]
    fn test_stats_menu_round_trips_through_engine() {
        let mut mock = MockEngine::accepting();
        mock.pending_request = Some(DialogRequest::Stats(stats()));
        let (mock, mut host) = host_with(mock);

        host.open_menu(MenuCommand::Stats);
        assert!(!host.is_open());
        assert_eq!(mock.borrow().calls, vec![format!("stats:{}", PLAYER)]);

        host.pump();
        assert!(matches!(host.dialog(), Some(OpenDialog::Stats(_))));
    }

    #[test]
    fn test_menu_blocked_while_dialog_open() {
        let (_mock, mut host) = host_with(MockEngine::accepting());
        host.open_menu(MenuCommand::Quests);
        assert!(matches!(host.dialog(), Some(OpenDialog::Quests(_))));

        host.open_menu(MenuCommand::NewCharacter);
        assert!(matches!(host.dialog(), Some(OpenDialog::Quests(_))));
    }

    #[test]
    fn test_keys_fall_through_without_dialog() {
        let (_mock, mut host) = host_with(MockEngine::accepting());
        assert!(!host.handle_key(KeyCode::Char('i')));
    }

    #[test]
    fn test_new_character_reaches_engine() {
        let (mock, mut host) = host_with(MockEngine::accepting());
        host.open_menu(MenuCommand::NewCharacter);
        for c in "Ayla".chars() {
            host.handle_key(KeyCode::Char(c));
        }
        for _ in 0..10 {
            host.handle_key(KeyCode::Down);
        }
        host.handle_key(KeyCode::Enter);

        assert!(!host.is_open());
        assert_eq!(mock.borrow().characters[0].name, "Ayla");
    }

    #[test]
    fn test_quicksave_needs_no_dialog() {
        let (mock, mut host) = host_with(MockEngine::accepting());
        host.open_menu(MenuCommand::QuickSave);
        assert!(!host.is_open());
        assert!(host.session().store().load().quicksave.is_some());
        assert_eq!(mock.borrow().logs.len(), 1);
    }

    #[test]
    fn test_preferences_commit_on_close() {
        let (_mock, mut host) = host_with(MockEngine::accepting());
        host.open_menu(MenuCommand::Preferences);
        host.handle_key(KeyCode::Right);
        host.handle_key(KeyCode::Esc);
        assert_eq!(host.session().preferences().scale, 3);
    }

    #[test]
    fn test_new_request_replaces_open_dialog() {
        let (_mock, mut host) = host_with(MockEngine::accepting());
        host.open_menu(MenuCommand::Quests);
        host.poster().post(Task::Open(DialogRequest::Stats(stats())));
        host.pump();
        assert!(matches!(host.dialog(), Some(OpenDialog::Stats(_))));
    }

    #[test]
    fn test_renders_transaction_dialog() {
        let (_mock, mut host) = host_with(MockEngine::accepting());
        host.poster().post(Task::Open(DialogRequest::Inventory {
            actor: PLAYER,
            items: items(&["Sword", "Shield"]),
        }));
        host.pump();

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| host.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(text.contains("Inventory"));
        assert!(text.contains("Shield"));
        assert!(text.contains("[d] Drop"));
    }
}
