//! Item and list records

pub mod record;

pub use record::{Frame, ItemRecord, Listable, QuestDescriptor, Spell, SpellId, TradeKind};
