//! Item and block kinds

use serde::{Deserialize, Serialize};

/// Every kind of item, placeable blocks included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Item {
    /// Nothing; empty slot or empty cell
    #[default]
    Air,
    GrassBlock,
    Stone,
    OakLog,
    OakLeaves,
    OakPlanks,
    Stick,
    Dirt,
    Cobblestone,
    CraftingTable,
    Apple,
    Torch,
}

impl Item {
    /// Every item kind, in declaration order
    pub const ALL: [Self; 12] = [
        Self::Air,
        Self::GrassBlock,
        Self::Stone,
        Self::OakLog,
        Self::OakLeaves,
        Self::OakPlanks,
        Self::Stick,
        Self::Dirt,
        Self::Cobblestone,
        Self::CraftingTable,
        Self::Apple,
        Self::Torch,
    ];

    /// Whether the item can be placed into the grid
    #[must_use]
    pub const fn is_block(self) -> bool {
        matches!(
            self,
            Self::GrassBlock
                | Self::Stone
                | Self::OakLog
                | Self::OakLeaves
                | Self::OakPlanks
                | Self::Dirt
                | Self::Cobblestone
                | Self::CraftingTable
        )
    }

    /// Whether this is the empty item
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Snake-case name, as used in texture paths
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::GrassBlock => "grass_block",
            Self::Stone => "stone",
            Self::OakLog => "oak_log",
            Self::OakLeaves => "oak_leaves",
            Self::OakPlanks => "oak_planks",
            Self::Stick => "stick",
            Self::Dirt => "dirt",
            Self::Cobblestone => "cobblestone",
            Self::CraftingTable => "crafting_table",
            Self::Apple => "apple",
            Self::Torch => "torch",
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_and_items() {
        assert!(Item::Stone.is_block());
        assert!(Item::CraftingTable.is_block());
        assert!(!Item::Stick.is_block());
        assert!(!Item::Air.is_block());
        assert!(Item::default().is_air());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Item::ALL.iter().map(|item| item.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Item::ALL.len());
    }
}
