//! Engine boundary
//!
//! The rules engine is an external authority. Everything the dialog layer
//! needs from it goes through the `Engine` trait; everything the engine wants
//! from the dialog layer goes through a `Poster<Task>` and is serviced later,
//! never from inside the engine call that asked for it.

pub mod demo;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;

use std::cell::RefCell;
use std::rc::Rc;

use crate::items::{ItemRecord, QuestDescriptor, SpellId};

pub use demo::DemoEngine;
pub use types::{
    ActorId, DialogRequest, NewCharacter, PlayerStats, Race, StatBlock, StatKind, Task, Tell,
};

/// Shared handle injected into every component that talks to the engine
pub type EngineHandle = Rc<RefCell<dyn Engine>>;

/// Capabilities the dialog layer requires from the engine.
///
/// Item indices are positions in the list the engine handed over when the
/// dialog opened. Boolean results are authoritative: `false` means nothing
/// changed on the engine side.
pub trait Engine {
    /// Gold shown in the info panel of dialogs opened for `actor`
    fn actor_gold(&self, actor: ActorId) -> i64;

    /// Equip label ("(E)", "(L)", ...) if the item is currently equipped
    fn is_equipped(&self, actor: ActorId, index: usize) -> Option<String>;

    fn drop_item(&mut self, actor: ActorId, index: usize) -> bool;
    fn pickup(&mut self, actor: ActorId, index: usize) -> bool;
    fn equip(&mut self, actor: ActorId, index: usize) -> bool;
    fn unequip(&mut self, actor: ActorId, index: usize) -> bool;
    fn buy(&mut self, actor: ActorId, index: usize) -> bool;
    fn sell(&mut self, actor: ActorId, index: usize) -> bool;

    /// Use a consumable. Returns the stack size left afterwards, or `None`
    /// for items that do not stack. A stack at zero is gone on the engine side.
    fn use_item(&mut self, actor: ActorId, index: usize) -> Option<u32>;

    fn set_spellbook_spell(&mut self, spell: SpellId);
    fn set_button(&mut self, button_index: usize, button: &ItemRecord);
    fn quests(&self) -> Vec<QuestDescriptor>;

    /// Ask the engine to push a `Stats` dialog for `actor`
    fn show_stats(&mut self, actor: ActorId);

    /// Answer to a tell prompt
    fn send_response(&mut self, actor: ActorId, choice: usize);

    fn player_name(&self) -> String;

    /// A game is in progress (menus hide save/quest entries otherwise)
    fn playing(&self) -> bool;

    /// Serialize the running game into an opaque blob
    fn save(&self) -> Vec<u8>;

    /// Replace the running game with a blob produced by `save`.
    /// Returns false if the engine rejects the blob.
    fn load_save(&mut self, bytes: &[u8]) -> bool;

    /// Append a line to the in-game message log
    fn log(&mut self, message: &str);

    fn new_game(&mut self, character: &NewCharacter);
}
