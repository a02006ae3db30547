//! Seeded terrain generation

use std::ops::Range;

use glam::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

use super::error::WorldError;
use super::item::Item;
use super::spawn::World;
use crate::ecs::{EntityId, Scene};

/// Columns between two noise lattice points
const NOISE_PERIOD: i32 = 8;

/// Terrain layout parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub seed: u64,
    /// Base surface height in cells
    pub water_level: i32,
    /// Maximum height added by noise, in cells
    pub amplitude: f32,
    /// Generated column range
    pub columns: Range<i32>,
    /// Column that always grows a tree, so one is near the spawn
    pub rigged_column: Option<i32>,
}

impl Level {
    /// Three 16-wide chunks centered on the origin
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            water_level: 16,
            amplitude: 5.0,
            columns: -16..32,
            rigged_column: Some(3),
        }
    }

    /// Set the generated column range
    #[must_use]
    pub fn with_columns(mut self, columns: Range<i32>) -> Self {
        self.columns = columns;
        self
    }

    /// Height of the grass block in column `x`
    #[must_use]
    pub fn surface_height(&self, x: i32) -> i32 {
        self.water_level + (self.amplitude * self.noise(x)) as i32
    }

    /// Smooth value noise in `[0, 1)`
    fn noise(&self, x: i32) -> f32 {
        let cell = x.div_euclid(NOISE_PERIOD);
        let t = x.rem_euclid(NOISE_PERIOD) as f32 / NOISE_PERIOD as f32;
        let t = t * t * (3.0 - 2.0 * t);

        let a = self.lattice(cell);
        let b = self.lattice(cell + 1);
        a + (b - a) * t
    }

    fn lattice(&self, cell: i32) -> f32 {
        let mix = (cell as i64 as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        StdRng::seed_from_u64(self.seed ^ mix).r#gen::<f32>()
    }

    /// Generate terrain and surface structures, then spawn the player above
    /// column 0. Returns the player entity.
    ///
    /// # Errors
    ///
    /// Fails if an entity cannot be spawned.
    pub fn generate(&self, scene: &mut Scene, world: &mut World) -> Result<EntityId, WorldError> {
        let mut occupied = FxHashSet::default();
        let mut surface = Vec::with_capacity(self.columns.len());

        for x in self.columns.clone() {
            let height = self.surface_height(x);
            for y in 0..height {
                world.spawn_block(scene, Item::Stone, IVec2::new(x, y))?;
                occupied.insert(IVec2::new(x, y));
            }
            world.spawn_block(scene, Item::GrassBlock, IVec2::new(x, height))?;
            occupied.insert(IVec2::new(x, height));
            surface.push((x, height));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let structures = world.registry.structures().to_vec();
        for &(x, height) in &surface {
            for structure in &structures {
                let mut roll = rng.r#gen::<f32>();
                if self.rigged_column == Some(x) {
                    roll = 0.0;
                }
                if roll >= structure.chance {
                    continue;
                }

                let base = IVec2::new(x, height + 1);
                for &(kind, offset) in &structure.blocks {
                    let cell = base + offset;
                    if occupied.insert(cell) {
                        world.spawn_block(scene, kind, cell)?;
                    }
                }
            }
        }

        log::info!(
            "Generated {} columns ({} blocks) with seed {}",
            surface.len(),
            occupied.len(),
            self.seed
        );

        let spawn = Vec2::new(0.0, (self.surface_height(0) + 1) as f32 * world.block_size);
        world.spawn_player(scene, spawn)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Assets, HeadlessLoader};
    use crate::ecs::{Block, Position};
    use crate::world::Registry;

    fn world() -> World {
        World::new(Registry::standard(), Assets::new(HeadlessLoader::default()), 32.0)
    }

    #[test]
    fn test_surface_stays_in_band() {
        let level = Level::new(99);

        for x in -100..100 {
            let height = level.surface_height(x);
            assert!((16..=21).contains(&height), "column {x}: {height}");
        }
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let a = Level::new(5);
        let b = Level::new(5);

        let heights_a: Vec<_> = (0..64).map(|x| a.surface_height(x)).collect();
        let heights_b: Vec<_> = (0..64).map(|x| b.surface_height(x)).collect();
        assert_eq!(heights_a, heights_b);
    }

    #[test]
    fn test_generate_fills_columns_and_spawns_player() {
        let level = Level::new(1).with_columns(3..4);
        let mut world = world();
        let mut scene = Scene::new();

        let player = level.generate(&mut scene, &mut world).unwrap();

        let blocks = scene.view::<(Block,)>();
        let cells: FxHashSet<IVec2> = blocks
            .iter()
            .map(|entity| scene.get::<Block>(entity).unwrap().cell)
            .collect();

        // No two blocks share a cell
        assert_eq!(cells.len(), blocks.len());

        // The rigged column grew a trunk
        let top = level.surface_height(3);
        let trunk = scene
            .view::<(Block,)>()
            .iter()
            .filter(|&entity| {
                let block = scene.get::<Block>(entity).unwrap();
                block.kind == Item::OakLog && block.cell.x == 3 && block.cell.y > top
            })
            .count();
        assert_eq!(trunk, 4);

        // Player stands one cell above the surface of column 0
        let expected = (level.surface_height(0) + 1) as f32 * 32.0;
        assert_eq!(scene.get::<Position>(player).unwrap().0, Vec2::new(0.0, expected));
    }
}
