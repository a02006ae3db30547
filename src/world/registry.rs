//! Static game data: textures, break times, loot tables and structures

use glam::IVec2;
use rand::Rng;
use rustc_hash::FxHashMap;

use super::item::Item;

/// One independent drop roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootEntry {
    /// Probability in `[0, 1]` that the entry drops
    pub chance: f32,
    pub item: Item,
}

/// Block pattern spawned on the surface with some chance per column
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// Probability per surface column
    pub chance: f32,
    /// Blocks relative to the cell above the surface
    pub blocks: Vec<(Item, IVec2)>,
}

/// Lookup tables for item behavior.
#[derive(Debug, Clone)]
pub struct Registry {
    textures: FxHashMap<Item, String>,
    /// Hold-units needed to break a block
    break_times: FxHashMap<Item, u64>,
    loot_tables: FxHashMap<Item, Vec<LootEntry>>,
    structures: Vec<Structure>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn empty() -> Self {
        Self {
            textures: FxHashMap::default(),
            break_times: FxHashMap::default(),
            loot_tables: FxHashMap::default(),
            structures: Vec::new(),
        }
    }

    /// Registry with the standard game content
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();

        for item in Item::ALL.into_iter().filter(|item| !item.is_air()) {
            let folder = if item.is_block() { "blocks" } else { "items" };
            registry.set_texture(item, format!("{folder}/{}.png", item.name()));
        }

        registry
            .set_break_time(Item::GrassBlock, 20)
            .set_break_time(Item::Stone, 80)
            .set_break_time(Item::OakLog, 60)
            .set_break_time(Item::OakLeaves, 20)
            .set_break_time(Item::OakPlanks, 60)
            .set_break_time(Item::Dirt, 20)
            .set_break_time(Item::Cobblestone, 80)
            .set_break_time(Item::CraftingTable, 60);

        registry.set_loot(
            Item::OakLeaves,
            vec![LootEntry {
                chance: 0.2,
                item: Item::OakPlanks,
            }],
        );

        registry.add_structure(Structure {
            chance: 0.08,
            blocks: oak_tree(),
        });

        registry
    }

    /// Set the texture name of an item
    pub fn set_texture(&mut self, item: Item, name: impl Into<String>) -> &mut Self {
        self.textures.insert(item, name.into());
        self
    }

    /// Set the break time of a block, in hold-units
    pub fn set_break_time(&mut self, item: Item, units: u64) -> &mut Self {
        self.break_times.insert(item, units);
        self
    }

    /// Replace the loot table of a block
    pub fn set_loot(&mut self, item: Item, entries: Vec<LootEntry>) -> &mut Self {
        self.loot_tables.insert(item, entries);
        self
    }

    /// Register a surface structure
    pub fn add_structure(&mut self, structure: Structure) -> &mut Self {
        self.structures.push(structure);
        self
    }

    /// Texture name of an item
    #[must_use]
    pub fn texture(&self, item: Item) -> Option<&str> {
        self.textures.get(&item).map(String::as_str)
    }

    /// Hold-units needed to break the block, `None` if unbreakable
    #[must_use]
    pub fn break_time(&self, item: Item) -> Option<u64> {
        self.break_times.get(&item).copied()
    }

    /// Loot table of a block; defaults to the block itself, always dropped
    #[must_use]
    pub fn loot(&self, item: Item) -> Vec<LootEntry> {
        match self.loot_tables.get(&item) {
            Some(entries) => entries.clone(),
            None => vec![LootEntry { chance: 1.0, item }],
        }
    }

    /// Roll every loot entry independently
    pub fn roll_loot<R: Rng>(&self, item: Item, rng: &mut R) -> Vec<Item> {
        self.loot(item)
            .into_iter()
            .filter(|entry| rng.r#gen::<f32>() < entry.chance)
            .map(|entry| entry.item)
            .collect()
    }

    /// Surface structures
    #[must_use]
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Four-log trunk with a leaf crown
fn oak_tree() -> Vec<(Item, IVec2)> {
    let mut blocks: Vec<_> = (0..4).map(|y| (Item::OakLog, IVec2::new(0, y))).collect();

    blocks.extend((-1..=1).map(|x| (Item::OakLeaves, IVec2::new(x, 5))));
    blocks.extend((-2..=2).map(|x| (Item::OakLeaves, IVec2::new(x, 4))));
    blocks.extend(
        [-2, -1, 1, 2]
            .into_iter()
            .map(|x| (Item::OakLeaves, IVec2::new(x, 3))),
    );

    blocks
}
