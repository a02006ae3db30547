//! World snapshots
//!
//! Saves and restores the player, every placed block and every loose item in
//! RON (Rusty Object Notation) or JSON.

use std::fs;
use std::path::Path;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::ecs::{Block, EcsError, EntityId, ItemDrop, Position, Scene, Velocity};
use crate::world::{HeldItem, Inventory, Item, World, WorldError};

/// Snapshot format written by this version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Player state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub inventory: Inventory,
    /// Stack on the cursor when the snapshot was taken
    #[serde(default)]
    pub held: HeldItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub kind: Item,
    pub cell: IVec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub kind: Item,
    pub position: Vec2,
}

/// Everything needed to rebuild a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Format version for compatibility
    pub version: u32,
    pub seed: u64,
    pub player: PlayerSnapshot,
    pub blocks: Vec<BlockSnapshot>,
    #[serde(default)]
    pub items: Vec<ItemSnapshot>,
}

impl WorldSnapshot {
    /// Capture the state of `scene` around `player`.
    ///
    /// # Errors
    ///
    /// Fails if `player` lacks a position, velocity or inventory.
    pub fn capture(scene: &mut Scene, player: EntityId, seed: u64) -> Result<Self, SnapshotError> {
        let player = PlayerSnapshot {
            position: scene.get::<Position>(player)?.0,
            velocity: scene.get::<Velocity>(player)?.0,
            inventory: scene.get::<Inventory>(player)?.clone(),
            held: scene.held,
        };

        let mut blocks = Vec::new();
        scene.view::<(Block,)>().each(scene, |_, (block,)| {
            blocks.push(BlockSnapshot {
                kind: block.kind,
                cell: block.cell,
            });
        });

        let mut items = Vec::new();
        scene.view::<(Position, ItemDrop)>().each(scene, |_, (position, item)| {
            items.push(ItemSnapshot {
                kind: item.kind,
                position: position.0,
            });
        });

        Ok(Self {
            version: SNAPSHOT_VERSION,
            seed,
            player,
            blocks,
            items,
        })
    }

    /// Build a fresh scene from the snapshot. Returns the scene and its player.
    ///
    /// # Errors
    ///
    /// Fails on an unknown format version or if an entity cannot be spawned.
    pub fn restore(&self, world: &mut World) -> Result<(Scene, EntityId), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }

        let mut scene = Scene::new();
        for block in &self.blocks {
            world.spawn_block(&mut scene, block.kind, block.cell)?;
        }
        for item in &self.items {
            world.spawn_item(&mut scene, item.kind, item.position)?;
        }

        let player = world.spawn_player(&mut scene, self.player.position)?;
        scene.get_mut::<Velocity>(player)?.0 = self.player.velocity;
        *scene.get_mut::<Inventory>(player)? = self.player.inventory.clone();
        scene.held = self.player.held;

        log::info!(
            "Restored snapshot: {} blocks, {} items",
            self.blocks.len(),
            self.items.len()
        );
        Ok((scene, player))
    }

    /// Serialize to a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, SnapshotError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SnapshotError::Serialize(e.to_string()))
    }

    /// Parse a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    pub fn from_ron_str(text: &str) -> Result<Self, SnapshotError> {
        ron::from_str(text).map_err(|e| SnapshotError::Deserialize(e.to_string()))
    }

    /// Serialize to a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json_string(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Serialize(e.to_string()))
    }

    /// Parse a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    pub fn from_json_str(text: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(text).map_err(|e| SnapshotError::Deserialize(e.to_string()))
    }

    /// Save the snapshot to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        fs::write(path, self.to_ron_string()?).map_err(|e| SnapshotError::Io(e.to_string()))
    }

    /// Load a snapshot from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|e| SnapshotError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the snapshot to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        fs::write(path, self.to_json_string()?).map_err(|e| SnapshotError::Io(e.to_string()))
    }

    /// Load a snapshot from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|e| SnapshotError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }
}

/// Errors that can occur during snapshot operations
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// IO error
    Io(String),
    /// Serialization error
    Serialize(String),
    /// Deserialization error
    Deserialize(String),
    /// Entity or component access failed
    Ecs(EcsError),
    /// Content could not be respawned
    World(WorldError),
    /// Written by an incompatible version
    UnsupportedVersion(u32),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
            Self::Deserialize(e) => write!(f, "Deserialization error: {e}"),
            Self::Ecs(e) => write!(f, "ECS error: {e}"),
            Self::World(e) => write!(f, "World error: {e}"),
            Self::UnsupportedVersion(v) => {
                write!(f, "unsupported snapshot version {v} (expected {SNAPSHOT_VERSION})")
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ecs(e) => Some(e),
            Self::World(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EcsError> for SnapshotError {
    fn from(e: EcsError) -> Self {
        Self::Ecs(e)
    }
}

impl From<WorldError> for SnapshotError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}
