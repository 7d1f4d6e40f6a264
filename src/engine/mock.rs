//! Scripted engine for tests

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{ActorId, DialogRequest, Engine, EngineHandle, NewCharacter, Task};
use crate::game::Poster;
use crate::items::{ItemRecord, QuestDescriptor, SpellId};

/// Engine double with canned answers and a call journal
#[derive(Default)]
pub(crate) struct MockEngine {
    /// Answer for every boolean action
    pub accept: bool,
    /// Indices reported as equipped
    pub equipped: HashSet<usize>,
    /// Stack sizes reported by `use_item` (decremented per use)
    pub stacks: HashMap<usize, u32>,
    pub gold: i64,
    pub name: String,
    pub blob: Vec<u8>,
    pub quests: Vec<QuestDescriptor>,
    /// Journal of `name:index` entries for every mutating call
    pub calls: Vec<String>,
    pub loaded: Vec<Vec<u8>>,
    pub logs: Vec<String>,
    pub spell: Option<SpellId>,
    pub buttons: Vec<(usize, String)>,
    pub responses: Vec<(ActorId, usize)>,
    pub characters: Vec<NewCharacter>,
    /// Posted from inside the next mutating call
    pub pending_request: Option<DialogRequest>,
    pub poster: Option<Poster<Task>>,
    /// Calls currently on the stack
    pub depth: Rc<Cell<u32>>,
    /// Calls that arrived while another call was still on the stack
    pub reentrant: Cell<u32>,
}

impl MockEngine {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            name: "Hero".to_string(),
            blob: vec![1, 2, 3],
            ..Self::default()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            ..Self::accepting()
        }
    }

    /// Wrap into a shared handle, keeping a typed handle for inspection
    pub fn shared(self) -> (Rc<RefCell<MockEngine>>, EngineHandle) {
        let typed = Rc::new(RefCell::new(self));
        let handle: EngineHandle = typed.clone();
        (typed, handle)
    }

    fn observe(&self) {
        if self.depth.get() > 0 {
            self.reentrant.set(self.reentrant.get() + 1);
        }
    }

    fn action(&mut self, name: &str, index: usize) -> bool {
        self.observe();
        self.depth.set(self.depth.get() + 1);
        self.calls.push(format!("{name}:{index}"));
        if let (Some(poster), Some(request)) = (&self.poster, self.pending_request.take()) {
            poster.post(Task::Open(request));
        }
        self.depth.set(self.depth.get() - 1);
        self.accept
    }
}

impl Engine for MockEngine {
    fn actor_gold(&self, _actor: ActorId) -> i64 {
        self.observe();
        self.gold
    }

    fn is_equipped(&self, _actor: ActorId, index: usize) -> Option<String> {
        self.observe();
        self.equipped.contains(&index).then(|| "(E)".to_string())
    }

    fn drop_item(&mut self, _actor: ActorId, index: usize) -> bool {
        self.action("drop", index)
    }

    fn pickup(&mut self, _actor: ActorId, index: usize) -> bool {
        self.action("pickup", index)
    }

    fn equip(&mut self, _actor: ActorId, index: usize) -> bool {
        let ok = self.action("equip", index);
        if ok {
            self.equipped.insert(index);
        }
        ok
    }

    fn unequip(&mut self, _actor: ActorId, index: usize) -> bool {
        let ok = self.action("unequip", index);
        if ok {
            self.equipped.remove(&index);
        }
        ok
    }

    fn buy(&mut self, _actor: ActorId, index: usize) -> bool {
        self.action("buy", index)
    }

    fn sell(&mut self, _actor: ActorId, index: usize) -> bool {
        self.action("sell", index)
    }

    fn use_item(&mut self, _actor: ActorId, index: usize) -> Option<u32> {
        self.action("use", index);
        let stack = self.stacks.get_mut(&index)?;
        *stack = stack.saturating_sub(1);
        Some(*stack)
    }

    fn set_spellbook_spell(&mut self, spell: SpellId) {
        self.observe();
        self.spell = Some(spell);
    }

    fn set_button(&mut self, button_index: usize, button: &ItemRecord) {
        self.observe();
        self.buttons.push((button_index, button.name.clone()));
    }

    fn quests(&self) -> Vec<QuestDescriptor> {
        self.observe();
        self.quests.clone()
    }

    fn show_stats(&mut self, actor: ActorId) {
        self.action("stats", actor as usize);
    }

    fn send_response(&mut self, actor: ActorId, choice: usize) {
        self.observe();
        self.responses.push((actor, choice));
    }

    fn player_name(&self) -> String {
        self.name.clone()
    }

    fn playing(&self) -> bool {
        true
    }

    fn save(&self) -> Vec<u8> {
        self.blob.clone()
    }

    fn load_save(&mut self, bytes: &[u8]) -> bool {
        self.loaded.push(bytes.to_vec());
        self.accept
    }

    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn new_game(&mut self, character: &NewCharacter) {
        self.characters.push(character.clone());
    }
}
