//! A small in-memory world for running the dialog layer without the real
//! rules engine.
//!
//! Three actors: the player, a merchant and a chest. World commands post
//! dialog requests through the poster the engine was built with, exactly as
//! the real engine does.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{
    ActorId, DialogRequest, NewCharacter, PlayerStats, Race, StatBlock, Task, Tell,
};
use super::Engine;
use crate::game::Poster;
use crate::items::{Frame, ItemRecord, QuestDescriptor, Spell, SpellId, TradeKind};

pub const PLAYER: ActorId = 1;
pub const MERCHANT: ActorId = 2;
pub const CHEST: ActorId = 3;
/// The villager who talks to the player
pub const ELDER: ActorId = 4;

const MAX_CARRIED: usize = 20;
const MAX_LOG: usize = 100;
const BUTTON_COUNT: usize = 4;

/// One entry in an actor's possessions
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Stack {
    item: ItemRecord,
    /// Equip label when worn
    equipped: Option<String>,
}

impl Stack {
    fn new(item: ItemRecord) -> Self {
        Self { item, equipped: None }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Holder {
    gold: i64,
    stacks: Vec<Stack>,
}

impl Holder {
    fn records(&self) -> Vec<ItemRecord> {
        self.stacks.iter().map(|s| s.item.clone()).collect()
    }
}

/// Everything that goes into a save
#[derive(Debug, Clone, Serialize, Deserialize)]
struct World {
    name: String,
    race: Race,
    portrait: u32,
    level: u32,
    exp: u32,
    hp: (i32, i32),
    stats: StatBlock,
    holders: BTreeMap<ActorId, Holder>,
    spells: Vec<Spell>,
    active_spell: Option<SpellId>,
    buttons: Vec<Option<String>>,
    quests: Vec<QuestDescriptor>,
    log: Vec<String>,
    playing: bool,
}

fn potion() -> ItemRecord {
    ItemRecord::new("Healing Potion")
        .usable()
        .with_quantity(3)
        .with_costs(25, 10)
        .with_info("Restores 8 HP")
        .with_frame(Frame::new(0, 32, 16, 16))
}

fn merchant_stock() -> Vec<Stack> {
    vec![
        Stack::new(potion().with_quantity(1)),
        Stack::new(
            ItemRecord::new("Long Sword")
                .equippable()
                .with_costs(90, 45)
                .with_info("Dmg 1-8, Wt 4")
                .with_restriction("Fighters only"),
        ),
        Stack::new(
            ItemRecord::new("Leather Armor")
                .equippable()
                .with_costs(60, 30)
                .with_info("AC 2, Wt 15"),
        ),
        Stack::new(
            ItemRecord::new("Scroll of Light")
                .usable()
                .with_costs(40, 20)
                .with_info("Lights the area"),
        ),
    ]
}

fn starting_pack() -> Vec<Stack> {
    vec![
        Stack {
            item: ItemRecord::new("Short Sword")
                .equippable()
                .with_costs(40, 20)
                .with_info("Dmg 1-6, Wt 3"),
            equipped: Some("(E)".to_string()),
        },
        Stack::new(ItemRecord::new("Wooden Shield").equippable().with_costs(20, 10).with_info("AC 1")),
        Stack::new(potion()),
        Stack::new(ItemRecord::new("Old Boot").with_costs(1, 1).with_info("Smells")),
    ]
}

impl World {
    fn new(character: &NewCharacter) -> Self {
        let mut holders = BTreeMap::new();
        holders.insert(PLAYER, Holder { gold: 120, stacks: starting_pack() });
        holders.insert(MERCHANT, Holder { gold: 1000, stacks: merchant_stock() });
        holders.insert(
            CHEST,
            Holder {
                gold: 0,
                stacks: vec![
                    Stack::new(ItemRecord::new("Silver Ring").equippable().with_costs(150, 75)),
                    Stack::new(potion().with_quantity(2)),
                    Stack::new(ItemRecord::new("Torch").with_costs(2, 1)),
                ],
            },
        );

        let hp = 6 + character.stats.vit;
        Self {
            name: character.name.clone(),
            race: character.race,
            portrait: character.portrait,
            level: 1,
            exp: 0,
            hp: (hp, hp),
            stats: character.stats,
            holders,
            spells: vec![
                Spell { id: 1, name: "Magic Missile".to_string(), level: 1, cost: 2, frame: None },
                Spell { id: 2, name: "Heal".to_string(), level: 1, cost: 3, frame: None },
                Spell { id: 7, name: "Fireball".to_string(), level: 3, cost: 8, frame: None },
            ],
            active_spell: None,
            buttons: vec![None; BUTTON_COUNT],
            quests: Vec::new(),
            log: Vec::new(),
            playing: true,
        }
    }
}

pub struct DemoEngine {
    world: World,
    poster: Poster<Task>,
}

impl DemoEngine {
    /// A game already in progress with a default human hero
    pub fn new(poster: Poster<Task>) -> Self {
        let hero = NewCharacter {
            name: "Aldon".to_string(),
            race: Race::Human,
            portrait: 600,
            stats: Race::Human.default_stats(),
        };
        Self {
            world: World::new(&hero),
            poster,
        }
    }

    /// Recent log lines, oldest first
    pub fn messages(&self) -> &[String] {
        &self.world.log
    }

    pub fn gold(&self) -> i64 {
        self.holder(PLAYER).map(|h| h.gold).unwrap_or(0)
    }

    fn holder(&self, actor: ActorId) -> Option<&Holder> {
        self.world.holders.get(&actor)
    }

    fn holder_mut(&mut self, actor: ActorId) -> Option<&mut Holder> {
        self.world.holders.get_mut(&actor)
    }

    fn stack(&self, actor: ActorId, index: usize) -> Option<&Stack> {
        self.holder(actor)?.stacks.get(index)
    }

    fn post(&self, request: DialogRequest) {
        log::debug!("Engine requests {} dialog", request.kind());
        self.poster.post(Task::Open(request));
    }

    fn say(&mut self, message: impl Into<String>) {
        self.world.log.push(message.into());
        if self.world.log.len() > MAX_LOG {
            self.world.log.remove(0);
        }
    }

    pub fn open_inventory(&self) {
        let items = self.holder(PLAYER).map(Holder::records).unwrap_or_default();
        self.post(DialogRequest::Inventory { actor: PLAYER, items });
    }

    pub fn open_shop(&self, kind: TradeKind) {
        let actor = match kind {
            TradeKind::Buy => MERCHANT,
            TradeKind::Sell => PLAYER,
        };
        let items = self.holder(actor).map(Holder::records).unwrap_or_default();
        self.post(DialogRequest::Trade { actor, items, kind });
    }

    pub fn open_chest(&mut self) {
        let items = self.holder(CHEST).map(Holder::records).unwrap_or_default();
        if items.is_empty() {
            self.say("The chest is empty.");
            return;
        }
        self.post(DialogRequest::Pickup { actor: CHEST, items });
    }

    pub fn open_spellbook(&self) {
        self.post(DialogRequest::Spellbook {
            spells: self.world.spells.clone(),
        });
    }

    /// Offer usable items and spells for a quick button
    pub fn pick_button(&self, button_index: usize) {
        let mut buttons: Vec<ItemRecord> = self
            .holder(PLAYER)
            .map(|h| h.stacks.iter().filter(|s| s.item.usable).map(|s| s.item.clone()).collect())
            .unwrap_or_default();
        buttons.extend(self.world.spells.iter().map(ItemRecord::from));
        self.post(DialogRequest::PickButton { button_index, buttons });
    }

    pub fn talk(&self) {
        self.post(DialogRequest::Tell(Tell {
            title: "Village Elder".to_string(),
            message: "Welcome to Aldon's Crossing.&Rats have overrun the cellar. Will you clear them out?"
                .to_string(),
            choices: vec![
                "I'll do it.".to_string(),
                "What's in it for me?".to_string(),
                "Not now.".to_string(),
            ],
            from: ELDER,
        }));
    }

    fn player_stats(&self) -> PlayerStats {
        let w = &self.world;
        PlayerStats {
            name: w.name.clone(),
            class: "Adventurer".to_string(),
            race: w.race.name().to_string(),
            level: w.level,
            can_level_up: w.exp >= 1000 * w.level,
            hp: w.hp,
            mp: (w.stats.wis, w.stats.wis),
            ac: 10 - self.armor_bonus(),
            exp: w.exp,
            gp: self.gold(),
            stats: w.stats,
        }
    }

    fn armor_bonus(&self) -> i32 {
        self.holder(PLAYER)
            .map(|h| h.stacks.iter().filter(|s| s.equipped.is_some() && s.item.equippable).count() as i32)
            .unwrap_or(0)
    }
}

impl Engine for DemoEngine {
    fn actor_gold(&self, actor: ActorId) -> i64 {
        // Trade dialogs show the player's purse whichever side is listed
        match actor {
            MERCHANT => self.gold(),
            _ => self.holder(actor).map(|h| h.gold).unwrap_or(0),
        }
    }

    fn is_equipped(&self, actor: ActorId, index: usize) -> Option<String> {
        self.stack(actor, index)?.equipped.clone()
    }

    fn drop_item(&mut self, actor: ActorId, index: usize) -> bool {
        let Some(stack) = self.stack(actor, index) else {
            return false;
        };
        if stack.equipped.is_some() {
            return false;
        }
        let Some(holder) = self.holder_mut(actor) else {
            return false;
        };
        let stack = holder.stacks.remove(index);
        self.say(format!("Dropped {}.", stack.item.name));
        true
    }

    fn pickup(&mut self, actor: ActorId, index: usize) -> bool {
        if self.stack(actor, index).is_none() {
            return false;
        }
        let carried = self.holder(PLAYER).map(|h| h.stacks.len()).unwrap_or(0);
        if carried >= MAX_CARRIED {
            return false;
        }
        let Some(stack) = self.holder_mut(actor).map(|h| h.stacks.remove(index)) else {
            return false;
        };
        let name = stack.item.name.clone();
        if let Some(player) = self.holder_mut(PLAYER) {
            player.stacks.push(stack);
        }
        self.say(format!("Picked up {}.", name));
        true
    }

    fn equip(&mut self, actor: ActorId, index: usize) -> bool {
        let Some(stack) = self.holder_mut(actor).and_then(|h| h.stacks.get_mut(index)) else {
            return false;
        };
        if !stack.item.equippable || stack.equipped.is_some() {
            return false;
        }
        stack.equipped = Some("(E)".to_string());
        true
    }

    fn unequip(&mut self, actor: ActorId, index: usize) -> bool {
        let Some(stack) = self.holder_mut(actor).and_then(|h| h.stacks.get_mut(index)) else {
            return false;
        };
        stack.equipped.take().is_some()
    }

    fn buy(&mut self, actor: ActorId, index: usize) -> bool {
        let Some(item) = self.stack(actor, index).map(|s| s.item.clone()) else {
            return false;
        };
        let cost = i64::from(TradeKind::Buy.cost(&item));
        let Some(player) = self.holder_mut(PLAYER) else {
            return false;
        };
        if player.gold < cost || player.stacks.len() >= MAX_CARRIED {
            return false;
        }
        player.gold -= cost;
        player.stacks.push(Stack::new(item.clone()));
        self.say(format!("Bought {} for {} gold.", item.name, cost));
        true
    }

    fn sell(&mut self, actor: ActorId, index: usize) -> bool {
        match self.stack(actor, index) {
            Some(stack) if stack.equipped.is_none() => {}
            _ => return false,
        }
        let Some(holder) = self.holder_mut(actor) else {
            return false;
        };
        let stack = holder.stacks.remove(index);
        let price = i64::from(TradeKind::Sell.cost(&stack.item));
        holder.gold += price;
        if let Some(merchant) = self.holder_mut(MERCHANT) {
            merchant.stacks.push(stack.clone());
        }
        self.say(format!("Sold {} for {} gold.", stack.item.name, price));
        true
    }

    fn use_item(&mut self, actor: ActorId, index: usize) -> Option<u32> {
        let (max_hp, name) = {
            let stack = self.stack(actor, index)?;
            if !stack.item.usable {
                return None;
            }
            (self.world.hp.1, stack.item.name.clone())
        };
        self.world.hp.0 = (self.world.hp.0 + 8).min(max_hp);
        self.say(format!("Used {}.", name));

        let holder = self.holder_mut(actor)?;
        let quantity = holder.stacks.get_mut(index)?.item.quantity.as_mut()?;
        *quantity = quantity.saturating_sub(1);
        let remaining = *quantity;
        if remaining == 0 {
            holder.stacks.remove(index);
        }
        Some(remaining)
    }

    fn set_spellbook_spell(&mut self, spell: SpellId) {
        self.world.active_spell = Some(spell);
        if let Some(name) = self.world.spells.iter().find(|s| s.id == spell).map(|s| s.name.clone()) {
            self.say(format!("{} readied.", name));
        }
    }

    fn set_button(&mut self, button_index: usize, button: &ItemRecord) {
        if let Some(slot) = self.world.buttons.get_mut(button_index) {
            *slot = Some(button.name.clone());
            self.say(format!("Button {} set to {}.", button_index + 1, button.name));
        }
    }

    fn quests(&self) -> Vec<QuestDescriptor> {
        self.world.quests.clone()
    }

    fn show_stats(&mut self, _actor: ActorId) {
        self.post(DialogRequest::Stats(self.player_stats()));
    }

    fn send_response(&mut self, actor: ActorId, choice: usize) {
        if actor != ELDER {
            return;
        }
        match choice {
            0 => {
                let quest = QuestDescriptor { name: "Clear the cellar of rats".to_string() };
                if !self.world.quests.contains(&quest) {
                    self.world.quests.push(quest);
                }
                self.say("Elder: Thank you, brave one.");
            }
            1 => {
                self.say("Elder: Fifty gold, and our gratitude.");
                self.post(DialogRequest::Tell(Tell {
                    title: "Village Elder".to_string(),
                    message: "Fifty gold pieces. Will you go?".to_string(),
                    choices: vec!["I'll do it.".to_string(), "Not now.".to_string()],
                    from: ELDER,
                }));
            }
            _ => self.say("Elder: Another time, then."),
        }
    }

    fn player_name(&self) -> String {
        self.world.name.clone()
    }

    fn playing(&self) -> bool {
        self.world.playing
    }

    fn save(&self) -> Vec<u8> {
        match serde_json::to_vec(&self.world) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Failed to serialize world: {}", e);
                Vec::new()
            }
        }
    }

    fn load_save(&mut self, bytes: &[u8]) -> bool {
        match serde_json::from_slice::<World>(bytes) {
            Ok(world) => {
                self.world = world;
                log::info!("World restored for {}", self.world.name);
                true
            }
            Err(e) => {
                log::warn!("Rejected save blob: {}", e);
                false
            }
        }
    }

    fn log(&mut self, message: &str) {
        self.say(message);
    }

    fn new_game(&mut self, character: &NewCharacter) {
        log::info!("New game for {} ({})", character.name, character.race.name());
        self.world = World::new(character);
        self.say(format!("Welcome, {}.", character.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::DeferredQueue;

    fn engine() -> (DeferredQueue<Task>, DemoEngine) {
        let queue = DeferredQueue::new();
        let engine = DemoEngine::new(queue.poster());
        (queue, engine)
    }

    #[test]
    fn test_world_commands_only_post() {
        let (queue, engine) = engine();
        engine.open_inventory();
        engine.open_shop(TradeKind::Buy);
        assert_eq!(queue.len(), 2);
        let Some(Task::Open(DialogRequest::Inventory { actor, items })) = queue.pop() else {
            panic!("expected inventory request");
        };
        assert_eq!(actor, PLAYER);
        assert_eq!(items[0].name, "Short Sword");
    }

    #[test]
    fn test_equipped_items_cannot_be_sold_or_dropped() {
        let (_queue, mut engine) = engine();
        assert_eq!(engine.is_equipped(PLAYER, 0).as_deref(), Some("(E)"));
        assert!(!engine.sell(PLAYER, 0));
        assert!(!engine.drop_item(PLAYER, 0));
        assert!(engine.unequip(PLAYER, 0));
        assert!(engine.sell(PLAYER, 0));
        assert_eq!(engine.gold(), 140);
    }

    #[test]
    fn test_buy_needs_gold() {
        let (_queue, mut engine) = engine();
        // Long Sword costs 90 of 120
        assert!(engine.buy(MERCHANT, 1));
        assert_eq!(engine.gold(), 30);
        assert!(!engine.buy(MERCHANT, 1));
        assert_eq!(engine.actor_gold(MERCHANT), 30);
    }

    #[test]
    fn test_use_counts_down_then_removes() {
        let (_queue, mut engine) = engine();
        assert_eq!(engine.use_item(PLAYER, 2), Some(2));
        assert_eq!(engine.use_item(PLAYER, 2), Some(1));
        assert_eq!(engine.use_item(PLAYER, 2), Some(0));
        assert_eq!(engine.stack(PLAYER, 2).map(|s| s.item.name.as_str()), Some("Old Boot"));
        assert_eq!(engine.use_item(PLAYER, 2), None);
    }

    #[test]
    fn test_pickup_moves_to_player() {
        let (_queue, mut engine) = engine();
        assert!(engine.pickup(CHEST, 0));
        let player = engine.holder(PLAYER).unwrap();
        assert_eq!(player.stacks.last().unwrap().item.name, "Silver Ring");
        assert_eq!(engine.holder(CHEST).unwrap().stacks.len(), 2);
    }

    #[test]
    fn test_save_then_load_restores_world() {
        let (_queue, mut engine) = engine();
        let blob = engine.save();
        assert!(engine.drop_item(PLAYER, 3));
        assert!(engine.load_save(&blob));
        assert_eq!(engine.holder(PLAYER).unwrap().stacks.len(), 4);
        assert!(!engine.load_save(b"not a save"));
    }

    #[test]
    fn test_stats_arrive_through_queue() {
        let (queue, mut engine) = engine();
        engine.show_stats(PLAYER);
        let Some(Task::Open(DialogRequest::Stats(stats))) = queue.pop() else {
            panic!("expected stats request");
        };
        assert_eq!(stats.name, "Aldon");
        assert_eq!(stats.gp, 120);
    }

    #[test]
    fn test_accepting_quest() {
        let (_queue, mut engine) = engine();
        engine.send_response(ELDER, 0);
        engine.send_response(ELDER, 0);
        assert_eq!(engine.quests().len(), 1);
    }

    #[test]
    fn test_new_game_replaces_world() {
        let (_queue, mut engine) = engine();
        engine.new_game(&NewCharacter {
            name: "Brynn".to_string(),
            race: Race::Elf,
            portrait: 651,
            stats: Race::Elf.default_stats(),
        });
        assert_eq!(engine.player_name(), "Brynn");
        assert_eq!(engine.messages().last().map(String::as_str), Some("Welcome, Brynn."));
    }
}
