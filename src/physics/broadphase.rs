//! Uniform-grid broad phase over static blocks
//!
//! Blocks are bucketed by the grid cells their boxes touch. Queries return
//! block *ordinals* (positions in the `(Collision, Block)` view) in ascending
//! order, so callers visit candidates in exactly the order a brute-force walk
//! over the view would.
//!
//! Block values can be edited in place without a structural change, so every
//! sync also compares the indexed boxes against the live components.

use glam::IVec2;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::aabb::Aabb;
use crate::ecs::{Block, Collision, EcsError, EntityId, Scene};

/// Grid of block boxes, rebuilt whenever a block is added, removed or moved
#[derive(Debug)]
pub struct BroadPhase {
    cell_size: f32,
    /// Scene epoch the grid was built at
    epoch: Option<u64>,
    /// Blocks in view order
    blocks: Vec<(EntityId, Aabb)>,
    cells: FxHashMap<IVec2, SmallVec<[u32; 4]>>,
    rebuilds: u64,
}

impl BroadPhase {
    /// Create an empty grid with square cells of `cell_size`
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            epoch: None,
            blocks: Vec::new(),
            cells: FxHashMap::default(),
            rebuilds: 0,
        }
    }

    /// Whether the set of blocks changed since the last rebuild
    #[must_use]
    pub fn is_stale(&self, scene: &Scene) -> bool {
        self.epoch != Some(scene.epoch())
    }

    /// Whether an indexed block's cell or collision box was edited in place
    fn has_moved_blocks(&self, scene: &Scene, block_size: f32) -> bool {
        self.blocks
            .iter()
            .any(|&(entity, aabb)| live_aabb(scene, entity, block_size) != Some(aabb))
    }

    /// Rebuild from the scene's blocks if any of them changed since last time.
    ///
    /// # Errors
    ///
    /// Propagates missing-component errors; a block yielded by the view
    /// always has both components, so this indicates a broken invariant.
    pub fn sync(&mut self, scene: &mut Scene, block_size: f32) -> Result<(), EcsError> {
        if !self.is_stale(scene) && !self.has_moved_blocks(scene, block_size) {
            return Ok(());
        }

        self.blocks.clear();
        self.cells.clear();

        let view = scene.view::<(Collision, Block)>();
        for (ordinal, entity) in view.iter().enumerate() {
            let block = scene.get::<Block>(entity)?;
            let aabb = scene.get::<Collision>(entity)?.aabb(block.origin(block_size));

            let (lo, hi) = self.cell_range(&aabb);
            for y in lo.y..=hi.y {
                for x in lo.x..=hi.x {
                    self.cells
                        .entry(IVec2::new(x, y))
                        .or_default()
                        .push(ordinal as u32);
                }
            }
            self.blocks.push((entity, aabb));
        }

        self.epoch = Some(scene.epoch());
        self.rebuilds += 1;
        log::trace!("Broad phase rebuilt: {} blocks in {} cells", self.blocks.len(), self.cells.len());
        Ok(())
    }

    /// Ordinals of every block that may overlap `area`, ascending.
    pub fn query(&self, area: &Aabb, out: &mut Vec<u32>) {
        out.clear();

        let (lo, hi) = self.cell_range(area);
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                if let Some(ordinals) = self.cells.get(&IVec2::new(x, y)) {
                    out.extend_from_slice(ordinals);
                }
            }
        }

        out.sort_unstable();
        out.dedup();
    }

    /// Block entity and box by ordinal
    #[must_use]
    pub fn block(&self, ordinal: u32) -> (EntityId, Aabb) {
        self.blocks[ordinal as usize]
    }

    /// Number of indexed blocks
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no block is indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of rebuilds so far
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Inclusive range of cells touched by `aabb`, edges included
    fn cell_range(&self, aabb: &Aabb) -> (IVec2, IVec2) {
        let lo = (aabb.min / self.cell_size).floor().as_ivec2();
        let hi = (aabb.max / self.cell_size).floor().as_ivec2();
        (lo, hi)
    }
}

/// Current box of a block entity, if it still is one
pub(super) fn live_aabb(scene: &Scene, entity: EntityId, block_size: f32) -> Option<Aabb> {
    let block = scene.get::<Block>(entity).ok()?;
    let collision = scene.get::<Collision>(entity).ok()?;
    Some(collision.aabb(block.origin(block_size)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Item;
    use glam::Vec2;

    fn add_block(scene: &mut Scene, cell: IVec2) -> EntityId {
        let entity = scene.new_entity();
        scene.emplace(entity, Block { kind: Item::Stone, cell }).unwrap();
        scene.emplace(entity, Collision::stationary(Vec2::splat(32.0))).unwrap();
        entity
    }

    #[test]
    fn test_query_finds_nearby_blocks_only() {
        let mut scene = Scene::new();
        let near = add_block(&mut scene, IVec2::new(0, 0));
        let far = add_block(&mut scene, IVec2::new(10, 10));

        let mut grid = BroadPhase::new(32.0);
        grid.sync(&mut scene, 32.0).unwrap();

        let mut out = Vec::new();
        grid.query(&Aabb::from_origin_size(Vec2::new(5.0, 5.0), Vec2::splat(10.0)), &mut out);

        let found: Vec<_> = out.iter().map(|&o| grid.block(o).0).collect();
        assert!(found.contains(&near));
        assert!(!found.contains(&far));
    }

    #[test]
    fn test_candidates_are_in_view_order() {
        let mut scene = Scene::new();
        for x in [3, 1, 2, 0] {
            add_block(&mut scene, IVec2::new(x, 0));
        }

        let mut grid = BroadPhase::new(32.0);
        grid.sync(&mut scene, 32.0).unwrap();

        let mut out = Vec::new();
        grid.query(&Aabb::new(Vec2::ZERO, Vec2::new(128.0, 32.0)), &mut out);

        assert_eq!(out, vec![0, 1, 2, 3]);
        let view = scene.view::<(Collision, Block)>();
        for &ordinal in &out {
            assert_eq!(grid.block(ordinal).0, view.entities()[ordinal as usize]);
        }
    }

    #[test]
    fn test_rebuilds_only_after_structural_change() {
        let mut scene = Scene::new();
        add_block(&mut scene, IVec2::ZERO);

        let mut grid = BroadPhase::new(32.0);
        grid.sync(&mut scene, 32.0).unwrap();
        grid.sync(&mut scene, 32.0).unwrap();
        assert_eq!(grid.rebuilds(), 1);

        let removed = add_block(&mut scene, IVec2::new(1, 0));
        assert!(grid.is_stale(&scene));
        grid.sync(&mut scene, 32.0).unwrap();
        assert_eq!(grid.len(), 2);

        scene.erase(removed).unwrap();
        grid.sync(&mut scene, 32.0).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.rebuilds(), 3);
    }

    #[test]
    fn test_in_place_edits_trigger_rebuild() {
        let mut scene = Scene::new();
        let block = add_block(&mut scene, IVec2::new(10, -1));

        let mut grid = BroadPhase::new(32.0);
        grid.sync(&mut scene, 32.0).unwrap();

        scene.get_mut::<Block>(block).unwrap().cell = IVec2::new(0, -1);
        assert!(!grid.is_stale(&scene));
        grid.sync(&mut scene, 32.0).unwrap();
        assert_eq!(grid.rebuilds(), 2);

        let mut out = Vec::new();
        grid.query(&Aabb::from_origin_size(Vec2::new(4.0, -8.0), Vec2::splat(4.0)), &mut out);
        assert_eq!(out, vec![0]);
        assert_eq!(grid.block(0).1, Aabb::from_origin_size(Vec2::new(0.0, -32.0), Vec2::splat(32.0)));

        scene.get_mut::<Collision>(block).unwrap().size = Vec2::splat(64.0);
        grid.sync(&mut scene, 32.0).unwrap();
        assert_eq!(grid.rebuilds(), 3);
        assert_eq!(grid.block(0).1.size(), Vec2::splat(64.0));
    }
}
