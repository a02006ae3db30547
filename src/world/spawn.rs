//! Entity templates for players, blocks and dropped items

use glam::{IVec2, Vec2};

use super::error::WorldError;
use super::inventory::Inventory;
use super::item::Item;
use super::registry::Registry;
use crate::assets::{AssetHandle, Assets, Texture};
use crate::ecs::{Block, Collision, EntityId, ItemDrop, Position, Scene, Sprite, Tags, Velocity};

/// Texture the player is drawn with
const PLAYER_TEXTURE: &str = "blocks/stone.png";

/// Dropped items sit this far into their source cell, in cells
const DROP_INSET: f32 = 0.4;

/// Dropped items are drawn at this fraction of a block
const DROP_SCALE: f32 = 0.3;

/// Game content plus the assets needed to spawn it
#[derive(Debug)]
pub struct World {
    pub registry: Registry,
    pub assets: Assets,
    /// Edge length of one grid cell in pixels
    pub block_size: f32,
}

impl World {
    /// Bundle content and assets
    #[must_use]
    pub fn new(registry: Registry, assets: Assets, block_size: f32) -> Self {
        Self {
            registry,
            assets,
            block_size,
        }
    }

    /// Texture of `item`, from the registry's texture name
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NoTexture`] if the registry has no texture for it
    /// and [`WorldError::Asset`] if loading fails.
    pub fn texture_of(&mut self, item: Item) -> Result<AssetHandle<Texture>, WorldError> {
        let name = self.registry.texture(item).ok_or(WorldError::NoTexture(item))?;
        Ok(self.assets.texture(name)?)
    }

    /// Spawn the player at `position`.
    ///
    /// # Errors
    ///
    /// Fails if the player texture cannot be loaded.
    pub fn spawn_player(&mut self, scene: &mut Scene, position: Vec2) -> Result<EntityId, WorldError> {
        let texture = self.assets.texture(PLAYER_TEXTURE)?;
        let size = Vec2::splat(self.block_size);

        let player = scene.new_entity();
        scene.emplace(player, Position(position))?;
        scene.emplace(player, Velocity(Vec2::ZERO))?;
        scene.emplace(player, Collision::new(size))?;
        scene.emplace(player, Tags::JUMP | Tags::PLAYER)?;
        scene.emplace(player, Inventory::new(Inventory::PLAYER_SIZE))?;
        scene.emplace(player, Sprite::new(texture, size))?;

        log::debug!("Spawned player {player} at {position}");
        Ok(player)
    }

    /// Spawn a stationary block at a grid cell.
    ///
    /// Does not check whether the cell is free.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotABlock`] for non-placeable items and fails if
    /// the block texture cannot be loaded.
    pub fn spawn_block(&mut self, scene: &mut Scene, kind: Item, cell: IVec2) -> Result<EntityId, WorldError> {
        if !kind.is_block() {
            return Err(WorldError::NotABlock(kind));
        }

        let texture = self.texture_of(kind)?;
        let size = Vec2::splat(self.block_size);

        let block = scene.new_entity();
        scene.emplace(block, Block { kind, cell })?;
        scene.emplace(block, Collision::stationary(size))?;
        scene.emplace(block, Sprite::new(texture, size))?;
        Ok(block)
    }

    /// Spawn a loose item at `position`
    ///
    /// # Errors
    ///
    /// Fails if the item texture cannot be loaded.
    pub fn spawn_item(&mut self, scene: &mut Scene, kind: Item, position: Vec2) -> Result<EntityId, WorldError> {
        let texture = self.texture_of(kind)?;

        let item = scene.new_entity();
        scene.emplace(item, Position(position))?;
        scene.emplace(item, ItemDrop { kind })?;
        scene.emplace(item, Sprite::new(texture, Vec2::splat(self.block_size * DROP_SCALE)))?;
        Ok(item)
    }

    /// Where loot from the block at `cell` lands
    #[must_use]
    pub fn drop_position(&self, cell: IVec2) -> Vec2 {
        (cell.as_vec2() + Vec2::splat(DROP_INSET)) * self.block_size
    }

    /// Grid cell containing a world-space point
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> IVec2 {
        (point / self.block_size).floor().as_ivec2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::HeadlessLoader;

    fn world() -> World {
        World::new(Registry::standard(), Assets::new(HeadlessLoader::default()), 32.0)
    }

    #[test]
    fn test_spawned_block_is_collidable() {
        let mut world = world();
        let mut scene = Scene::new();

        let block = world.spawn_block(&mut scene, Item::Stone, IVec2::new(2, -1)).unwrap();

        assert_eq!(scene.get::<Block>(block).unwrap().cell, IVec2::new(2, -1));
        assert!(scene.get::<Collision>(block).unwrap().stationary);
        assert_eq!(scene.view::<(Collision, Block)>().len(), 1);
    }

    #[test]
    fn test_items_are_not_blocks() {
        let mut world = world();
        let mut scene = Scene::new();

        assert_eq!(
            world.spawn_block(&mut scene, Item::Stick, IVec2::ZERO),
            Err(WorldError::NotABlock(Item::Stick))
        );
        assert_eq!(scene.entity_count(), 0);
    }

    #[test]
    fn test_dropped_item_has_no_collision() {
        let mut world = world();
        let mut scene = Scene::new();

        let item = world.spawn_item(&mut scene, Item::Apple, Vec2::new(5.0, 5.0)).unwrap();

        assert!(!scene.contains::<Collision>(item));
        assert_eq!(scene.get::<ItemDrop>(item).unwrap().kind, Item::Apple);
    }

    #[test]
    fn test_player_template() {
        let mut world = world();
        let mut scene = Scene::new();

        let player = world.spawn_player(&mut scene, Vec2::new(0.0, 100.0)).unwrap();

        assert!(scene.get::<Tags>(player).unwrap().has(Tags::PLAYER | Tags::JUMP));
        assert_eq!(scene.view::<(Position, Velocity, Collision, Inventory)>().len(), 1);
    }

    #[test]
    fn test_cell_at_floors_negative_coordinates() {
        let world = world();

        assert_eq!(world.cell_at(Vec2::new(31.9, 0.0)), IVec2::new(0, 0));
        assert_eq!(world.cell_at(Vec2::new(-0.5, -32.0)), IVec2::new(-1, -1));
        assert_eq!(world.cell_at(Vec2::new(-32.5, 64.0)), IVec2::new(-2, 2));
        assert_eq!(world.drop_position(IVec2::new(1, 0)), Vec2::new(44.8, 12.8));
    }
}
