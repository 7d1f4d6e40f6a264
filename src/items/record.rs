//! Engine-provided records
//!
//! The widgets never interpret these beyond display. Everything with
//! business meaning (legality, pricing, equip state) is answered by the engine.

use serde::{Deserialize, Serialize};

/// Spell identifier as understood by the engine
pub type SpellId = u32;

/// A rectangle on the spritesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Frame {
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }
}

/// Capability interface for anything shown in a selection list.
///
/// Only `display_name` is required. Pickers that have an info panel or a
/// preview pane ask for the optional parts and skip them when absent.
pub trait Listable {
    /// Intrinsic name of the record, before any contextual decoration
    fn display_name(&self) -> String;

    /// Sprite to draw in the preview pane
    fn preview_frame(&self) -> Option<Frame> {
        None
    }

    /// Free-text description shown under the preview
    fn info_text(&self) -> Option<&str> {
        None
    }

    /// Short restriction line shown above the list ("Fighters only", ...)
    fn restriction_text(&self) -> Option<&str> {
        None
    }
}

/// An item as handed over by the engine when a transaction dialog opens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Display name
    pub name: String,
    /// Sprite frame for the preview pane
    pub frame: Option<Frame>,
    /// Human-readable restriction ("Wizards only")
    pub restriction: Option<String>,
    /// Free-text info ("Dmg 1-6, Wt 3")
    pub info: Option<String>,
    /// Stack size for consumables
    pub quantity: Option<u32>,
    /// Can be used from the inventory (potions, scrolls)
    pub usable: bool,
    /// Can be equipped
    pub equippable: bool,
    /// Price when buying from a merchant
    pub buy_cost: u32,
    /// Price when selling to a merchant
    pub sell_cost: u32,
    /// Engine identity, only present for records that are set by id (spells)
    pub id: Option<u32>,
}

impl ItemRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn with_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.restriction = Some(restriction.into());
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn usable(mut self) -> Self {
        self.usable = true;
        self
    }

    pub fn equippable(mut self) -> Self {
        self.equippable = true;
        self
    }

    pub fn with_costs(mut self, buy: u32, sell: u32) -> Self {
        self.buy_cost = buy;
        self.sell_cost = sell;
        self
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// True once a consumable stack has run out
    pub fn is_exhausted(&self) -> bool {
        self.quantity == Some(0)
    }
}

impl Listable for ItemRecord {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn preview_frame(&self) -> Option<Frame> {
        self.frame
    }

    fn info_text(&self) -> Option<&str> {
        self.info.as_deref()
    }

    fn restriction_text(&self) -> Option<&str> {
        self.restriction.as_deref()
    }
}

/// A spell known to the player, as listed in the spellbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub id: SpellId,
    pub name: String,
    pub level: u32,
    pub cost: u32,
    pub frame: Option<Frame>,
}

impl From<&Spell> for ItemRecord {
    fn from(spell: &Spell) -> Self {
        ItemRecord {
            name: spell.name.clone(),
            frame: spell.frame,
            restriction: Some("Set Item or Ability.".to_string()),
            info: Some(format!("Level={}, Mana Cost={}", spell.level, spell.cost)),
            id: Some(spell.id),
            ..ItemRecord::default()
        }
    }
}

/// One line of the quest log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDescriptor {
    pub name: String,
}

impl Listable for QuestDescriptor {
    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Listable for String {
    fn display_name(&self) -> String {
        self.clone()
    }
}

/// Merchant dialog direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    Buy,
    Sell,
}

impl TradeKind {
    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            TradeKind::Buy => "Buy",
            TradeKind::Sell => "Sell",
        }
    }

    /// The price that applies to `item` in this direction
    pub fn cost(&self, item: &ItemRecord) -> u32 {
        match self {
            TradeKind::Buy => item.buy_cost,
            TradeKind::Sell => item.sell_cost,
        }
    }
}
