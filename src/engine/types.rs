//! Descriptor types that cross the engine boundary

use serde::{Deserialize, Serialize};

use crate::items::{ItemRecord, Spell, TradeKind};

/// Engine-side entity identifier (player, merchant, chest, ...)
pub type ActorId = u32;

/// The six primary stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Str,
    Dex,
    Vit,
    Int,
    Wis,
    Luck,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Str,
        StatKind::Dex,
        StatKind::Vit,
        StatKind::Int,
        StatKind::Wis,
        StatKind::Luck,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatKind::Str => "Str",
            StatKind::Dex => "Dex",
            StatKind::Vit => "Vit",
            StatKind::Int => "Int",
            StatKind::Wis => "Wis",
            StatKind::Luck => "Luck",
        }
    }
}

/// A full set of primary stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub str: i32,
    pub dex: i32,
    pub vit: i32,
    pub int: i32,
    pub wis: i32,
    pub luck: i32,
}

impl StatBlock {
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Str => self.str,
            StatKind::Dex => self.dex,
            StatKind::Vit => self.vit,
            StatKind::Int => self.int,
            StatKind::Wis => self.wis,
            StatKind::Luck => self.luck,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Str => &mut self.str,
            StatKind::Dex => &mut self.dex,
            StatKind::Vit => &mut self.vit,
            StatKind::Int => &mut self.int,
            StatKind::Wis => &mut self.wis,
            StatKind::Luck => &mut self.luck,
        }
    }
}

/// Playable races
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Dwarf,
    Elf,
}

impl Race {
    pub const ALL: [Race; 3] = [Race::Human, Race::Dwarf, Race::Elf];

    pub fn name(&self) -> &'static str {
        match self {
            Race::Human => "Human",
            Race::Dwarf => "Dwarf",
            Race::Elf => "Elf",
        }
    }

    /// Starting stats before any points are spent
    pub fn default_stats(&self) -> StatBlock {
        match self {
            Race::Human => StatBlock { str: 8, dex: 8, vit: 8, int: 8, wis: 8, luck: 8 },
            Race::Dwarf => StatBlock { str: 10, dex: 7, vit: 9, int: 7, wis: 8, luck: 8 },
            Race::Elf => StatBlock { str: 7, dex: 10, vit: 7, int: 8, wis: 8, luck: 8 },
        }
    }

    /// Inclusive (min, max) for a stat
    pub fn bounds(&self, kind: StatKind) -> (i32, i32) {
        use StatKind::*;
        match (self, kind) {
            (Race::Human, Luck) => (3, 18),
            (Race::Human, _) => (3, 16),
            (Race::Dwarf, Str) | (Race::Dwarf, Vit) => (5, 17),
            (Race::Dwarf, Dex) | (Race::Dwarf, Int) => (2, 15),
            (Race::Dwarf, Wis) | (Race::Dwarf, Luck) => (3, 16),
            (Race::Elf, Str) | (Race::Elf, Vit) => (2, 15),
            (Race::Elf, Dex) => (5, 18),
            (Race::Elf, Int) | (Race::Elf, Wis) | (Race::Elf, Luck) => (3, 16),
        }
    }
}

/// Result of character creation, handed to `Engine::new_game`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    pub race: Race,
    pub portrait: u32,
    pub stats: StatBlock,
}

/// Character sheet contents for the stats dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub class: String,
    pub race: String,
    pub level: u32,
    /// Experience is enough for the next level
    pub can_level_up: bool,
    pub hp: (i32, i32),
    pub mp: (i32, i32),
    pub ac: i32,
    pub exp: u32,
    pub gp: i64,
    pub stats: StatBlock,
}

/// A narrative prompt with up to three answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tell {
    pub title: String,
    /// `&` marks a line break
    pub message: String,
    pub choices: Vec<String>,
    /// Actor the answer is sent back to
    pub from: ActorId,
}

/// A dialog the engine asks the host to open
#[derive(Debug, Clone, PartialEq)]
pub enum DialogRequest {
    /// Actor's own inventory: drop, equip/unequip, use
    Inventory { actor: ActorId, items: Vec<ItemRecord> },
    /// Merchant dialog
    Trade {
        actor: ActorId,
        items: Vec<ItemRecord>,
        kind: TradeKind,
    },
    /// Container or ground pile
    Pickup { actor: ActorId, items: Vec<ItemRecord> },
    /// Assign an item or ability to a quick button
    PickButton {
        button_index: usize,
        buttons: Vec<ItemRecord>,
    },
    Spellbook { spells: Vec<Spell> },
    Stats(PlayerStats),
    Tell(Tell),
}

impl DialogRequest {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            DialogRequest::Inventory { .. } => "inventory",
            DialogRequest::Trade { .. } => "trade",
            DialogRequest::Pickup { .. } => "pickup",
            DialogRequest::PickButton { .. } => "pick-button",
            DialogRequest::Spellbook { .. } => "spellbook",
            DialogRequest::Stats(_) => "stats",
            DialogRequest::Tell(_) => "tell",
        }
    }
}

/// Work item for the host's deferred queue
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Open a dialog
    Open(DialogRequest),
    /// Answer a tell prompt
    Respond { actor: ActorId, choice: usize },
}
