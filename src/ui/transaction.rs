//! Transaction dialogs
//!
//! A `TransactionController` wraps one selection list and one actor and runs
//! the optimistic action protocol against the engine: read the selection,
//! invoke the engine, fold the answer back into the list, surface a status
//! message. Engine answers are authoritative; a rejection leaves the list
//! exactly as it was.

use std::rc::Rc;

use crate::engine::{ActorId, EngineHandle};
use crate::items::{ItemRecord, Spell, TradeKind};
use crate::ui::widgets::SelectionList;

/// A user-triggered action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Drop,
    Pickup,
    Equip,
    Unequip,
    Buy,
    Sell,
    Use,
    /// Spellbook: make the selected spell the active one
    SetSpell,
    /// Button picker: bind the selected record to the button
    SetButton,
}

/// Which actions a dialog offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSet {
    /// drop, equip/unequip, use
    Inventory,
    /// buy or sell, plus unequip
    Trade(TradeKind),
    Pickup,
    Spellbook,
    ButtonPicker { button_index: usize },
}

impl ActionSet {
    pub fn allows(&self, action: Action) -> bool {
        use Action::*;
        match self {
            ActionSet::Inventory => matches!(action, Drop | Equip | Unequip | Use),
            ActionSet::Trade(TradeKind::Buy) => matches!(action, Buy | Unequip),
            ActionSet::Trade(TradeKind::Sell) => matches!(action, Sell | Unequip),
            ActionSet::Pickup => action == Pickup,
            ActionSet::Spellbook => action == SetSpell,
            ActionSet::ButtonPicker { .. } => action == SetButton,
        }
    }
}

/// What a trigger did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing selected, or the action is not offered here
    Ignored,
    /// Engine accepted; the list may have changed
    Applied,
    /// Engine refused; only the status message changed
    Rejected(String),
    /// The dialog is finished and should be torn down
    Closed,
}

/// A button the host should draw for the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub action: Action,
    pub label: &'static str,
    pub key: char,
}

/// Optimistic-update protocol over one list and one actor
pub struct TransactionController {
    engine: EngineHandle,
    actor: ActorId,
    actions: ActionSet,
    list: SelectionList<ItemRecord>,
    status: Option<String>,
    /// Engine's view of whether the selected item is equipped, re-queried on
    /// every refresh
    equipped: bool,
}

impl TransactionController {
    fn with_list(
        engine: EngineHandle,
        actor: ActorId,
        actions: ActionSet,
        list: SelectionList<ItemRecord>,
    ) -> Self {
        let mut controller = Self {
            engine,
            actor,
            actions,
            list,
            status: None,
            equipped: false,
        };
        controller.sync_equipped();
        controller
    }

    /// Actor's inventory. Rows carry the engine's equip label.
    pub fn inventory(engine: EngineHandle, actor: ActorId, items: Vec<ItemRecord>) -> Self {
        let namer_engine = Rc::clone(&engine);
        let list = SelectionList::from_items(items).with_namer(move |item: &ItemRecord, i| {
            match namer_engine.borrow().is_equipped(actor, i) {
                Some(label) => format!("{} {}", label, item.name),
                None => item.name.clone(),
            }
        });
        Self::with_list(engine, actor, ActionSet::Inventory, list)
    }

    /// Merchant dialog. Rows carry the price for this direction.
    pub fn trade(
        engine: EngineHandle,
        actor: ActorId,
        items: Vec<ItemRecord>,
        kind: TradeKind,
    ) -> Self {
        let list = SelectionList::from_items(items)
            .with_namer(move |item: &ItemRecord, _| format!("({}){}", kind.cost(item), item.name));
        Self::with_list(engine, actor, ActionSet::Trade(kind), list)
    }

    /// Container or ground pile
    pub fn pickup(engine: EngineHandle, actor: ActorId, items: Vec<ItemRecord>) -> Self {
        Self::with_list(engine, actor, ActionSet::Pickup, SelectionList::from_items(items))
    }

    /// Spellbook: the records carry spell ids
    pub fn spellbook(engine: EngineHandle, actor: ActorId, spells: &[Spell]) -> Self {
        let list = SelectionList::from_items(spells.iter().map(ItemRecord::from));
        Self::with_list(engine, actor, ActionSet::Spellbook, list)
    }

    /// Quick-button assignment
    pub fn button_picker(
        engine: EngineHandle,
        actor: ActorId,
        button_index: usize,
        buttons: Vec<ItemRecord>,
    ) -> Self {
        Self::with_list(
            engine,
            actor,
            ActionSet::ButtonPicker { button_index },
            SelectionList::from_items(buttons),
        )
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn actions(&self) -> ActionSet {
        self.actions
    }

    pub fn list(&self) -> &SelectionList<ItemRecord> {
        &self.list
    }

    /// Last status message
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    /// Gold line for the info panel
    pub fn gold(&self) -> Option<i64> {
        match self.actions {
            ActionSet::Inventory | ActionSet::Trade(_) | ActionSet::Pickup => {
                Some(self.engine.borrow().actor_gold(self.actor))
            }
            _ => None,
        }
    }

    /// Dialogs with an info panel (restriction line, info text, gold)
    pub fn shows_info(&self) -> bool {
        !matches!(self.actions, ActionSet::ButtonPicker { .. })
    }

    pub fn select(&mut self, index: usize) -> Result<(), crate::ui::widgets::SelectionError> {
        self.list.select(index)?;
        self.sync_equipped();
        Ok(())
    }

    pub fn select_next(&mut self) {
        self.list.select_next();
        self.sync_equipped();
    }

    pub fn select_prev(&mut self) {
        self.list.select_prev();
        self.sync_equipped();
    }

    /// Buttons to draw for the current selection
    pub fn buttons(&self) -> Vec<ActionButton> {
        let mut buttons = Vec::new();
        match self.actions {
            ActionSet::Inventory => {
                buttons.push(ActionButton { action: Action::Drop, label: "Drop", key: 'd' });
                if let Some(action) = self.primary_action() {
                    let label = match action {
                        Action::Use => "Use",
                        Action::Unequip => "Unequip",
                        _ => "Equip",
                    };
                    buttons.push(ActionButton { action, label, key: 'e' });
                }
            }
            ActionSet::Trade(kind) => {
                let action = match kind {
                    TradeKind::Buy => Action::Buy,
                    TradeKind::Sell => Action::Sell,
                };
                buttons.push(ActionButton { action, label: kind.label(), key: 'b' });
                if self.equipped {
                    buttons.push(ActionButton { action: Action::Unequip, label: "Unequip", key: 'u' });
                }
            }
            ActionSet::Pickup => {
                buttons.push(ActionButton { action: Action::Pickup, label: "Pickup", key: 'p' });
            }
            ActionSet::Spellbook | ActionSet::ButtonPicker { .. } => {
                let action = if self.actions == ActionSet::Spellbook {
                    Action::SetSpell
                } else {
                    Action::SetButton
                };
                buttons.push(ActionButton { action, label: "Set", key: 's' });
            }
        }
        buttons
    }

    /// Inventory's context button: Use for consumables, else Equip/Unequip
    pub fn primary_action(&self) -> Option<Action> {
        let item = self.list.selected()?;
        if item.usable {
            Some(Action::Use)
        } else if self.equipped {
            Some(Action::Unequip)
        } else {
            Some(Action::Equip)
        }
    }

    /// Run `action` against the current selection
    pub fn trigger(&mut self, action: Action) -> Outcome {
        if !self.actions.allows(action) {
            log::debug!("{:?} not offered by {:?}", action, self.actions);
            return Outcome::Ignored;
        }
        let Some(index) = self.list.selected_index() else {
            return Outcome::Ignored;
        };
        let actor = self.actor;
        log::debug!("{:?} actor={} index={}", action, actor, index);

        match action {
            Action::Drop => {
                let ok = self.engine.borrow_mut().drop_item(actor, index);
                self.removing(ok, None, "Can't drop")
            }
            Action::Pickup => {
                let ok = self.engine.borrow_mut().pickup(actor, index);
                self.removing(ok, None, "You can't pick this up.")
            }
            Action::Sell => {
                if self.engine.borrow().is_equipped(actor, index).is_some() {
                    return self.reject("Item is equiped.");
                }
                let ok = self.engine.borrow_mut().sell(actor, index);
                self.removing(ok, Some("Sold!"), "You can't sell this.")
            }
            Action::Buy => {
                let ok = self.engine.borrow_mut().buy(actor, index);
                self.in_place(ok, Some("Sold!"), "You can't buy this.")
            }
            Action::Equip => {
                let ok = self.engine.borrow_mut().equip(actor, index);
                self.in_place(ok, None, "Can't equip")
            }
            Action::Unequip => {
                let ok = self.engine.borrow_mut().unequip(actor, index);
                let success = match self.actions {
                    ActionSet::Trade(_) => Some("Unequiped"),
                    _ => None,
                };
                self.in_place(ok, success, "Can't unequip")
            }
            Action::Use => self.use_selected(actor, index),
            Action::SetSpell => {
                let Some(spell) = self.list.selected().and_then(|item| item.id) else {
                    log::warn!("Spellbook entry at {} has no spell id", index);
                    return Outcome::Ignored;
                };
                self.engine.borrow_mut().set_spellbook_spell(spell);
                Outcome::Closed
            }
            Action::SetButton => {
                let ActionSet::ButtonPicker { button_index } = self.actions else {
                    return Outcome::Ignored;
                };
                if let Some(button) = self.list.selected() {
                    self.engine.borrow_mut().set_button(button_index, button);
                }
                Outcome::Closed
            }
        }
    }

    fn use_selected(&mut self, actor: ActorId, index: usize) -> Outcome {
        let remaining = self.engine.borrow_mut().use_item(actor, index);
        if let (Some(quantity), Some(item)) = (remaining, self.list.selected_mut()) {
            item.quantity = Some(quantity);
        }
        if self.list.selected().is_some_and(ItemRecord::is_exhausted) {
            self.list.remove_selected();
            if self.list.is_empty() {
                return Outcome::Closed;
            }
            self.refresh(None);
        } else {
            self.refresh(Some("Used."));
        }
        Outcome::Applied
    }

    /// Success removes the row; an emptied list closes the dialog
    fn removing(&mut self, ok: bool, success: Option<&str>, failure: &str) -> Outcome {
        if !ok {
            return self.reject(failure);
        }
        self.list.remove_selected();
        if self.list.is_empty() {
            self.status = None;
            return Outcome::Closed;
        }
        self.refresh(success);
        Outcome::Applied
    }

    /// Success keeps list membership as is
    fn in_place(&mut self, ok: bool, success: Option<&str>, failure: &str) -> Outcome {
        if !ok {
            return self.reject(failure);
        }
        self.refresh(success);
        Outcome::Applied
    }

    fn reject(&mut self, message: &str) -> Outcome {
        self.refresh(Some(message));
        Outcome::Rejected(message.to_string())
    }

    /// Ask the engine for this actor's stats sheet
    pub fn request_stats(&self) {
        self.engine.borrow_mut().show_stats(self.actor);
    }

    /// Re-render with an optional status override, then re-ask the engine
    /// about equip state
    pub fn refresh(&mut self, message: Option<&str>) {
        self.status = message.map(str::to_string);
        self.list.refresh(message);
        self.sync_equipped();
    }

    fn sync_equipped(&mut self) {
        self.equipped = match (self.actions, self.list.selected_index()) {
            (ActionSet::Inventory | ActionSet::Trade(_), Some(index)) => {
                self.engine.borrow().is_equipped(self.actor, index).is_some()
            }
            _ => false,
        };
    }
}
