//! Player control, block placement and block breaking
//!
//! Runs once per frame before physics. Reads keystate and mouse state from
//! [`Input`], consumes its one-shot signals from the scene and mutates the
//! scene structurally when blocks are placed or broken. While the inventory
//! screen is open (E), mouse input goes to the screen instead of the world.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::screen::InventoryScreen;
use super::state::{Input, MouseButton, Scancode};
use crate::ecs::signal::{self, PHYSICS_DIRTY, RIGHT_CLICK_DOWN};
use crate::ecs::{Block, Collision, EntityId, Position, Scene, Tags, Velocity};
use crate::physics::Aabb;
use crate::world::{Inventory, Item, World, WorldError};

/// Horizontal speed added per frame while A or D is held
const WALK_IMPULSE: f32 = 70.0;
/// Walking stops adding speed past this
const WALK_LIMIT: f32 = 220.0;

/// Hold-units gained per second of holding
const UNITS_PER_SECOND: f32 = 20.0;
/// Holds shorter than this (0.1 s) are plain clicks
const ACTIVATION_UNITS: f32 = 2.0;
/// Number of destruction overlay stages
const STAGES: f32 = 10.0;

/// Placement box inset from the cell corner, as a fraction of a block
const PLACE_INSET: f32 = 5.0 / 32.0;
/// Placement box extent, as a fraction of a block
const PLACE_EXTENT: f32 = 0.9;

/// Block currently being broken, for the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destruction {
    pub cell: IVec2,
    /// Progress stage in `0..=9`
    pub stage: u8,
}

/// What happened during one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputStats {
    pub placed: usize,
    pub broken: usize,
    pub dropped: usize,
}

/// Translates held keys, clicks and holds into world changes
#[derive(Debug)]
pub struct InputSystem {
    /// Cell the left button has been held on
    target: Option<IVec2>,
    hold_units: f32,
    destruction: Option<Destruction>,
    rng: StdRng,
    screen: InventoryScreen,
    stats: InputStats,
}

impl InputSystem {
    /// Create an input system whose loot rolls are seeded by `seed`
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            target: None,
            hold_units: 0.0,
            destruction: None,
            rng: StdRng::seed_from_u64(seed),
            screen: InventoryScreen::new(),
            stats: InputStats::default(),
        }
    }

    /// Overlay for the block being broken, if any
    #[must_use]
    pub fn destruction(&self) -> Option<Destruction> {
        self.destruction
    }

    /// Counters for the last update
    #[must_use]
    pub fn stats(&self) -> InputStats {
        self.stats
    }

    /// The inventory screen
    #[must_use]
    pub fn screen(&self) -> &InventoryScreen {
        &self.screen
    }

    /// Hold-units accumulated on the current target
    #[must_use]
    pub fn hold_units(&self) -> f32 {
        self.hold_units
    }

    /// Run one frame of input handling for `player`.
    ///
    /// # Errors
    ///
    /// Fails if `player` lacks a position or inventory, or if a block or loot
    /// entity cannot be spawned.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        world: &mut World,
        input: &Input,
        player: EntityId,
        delta: f32,
    ) -> Result<(), WorldError> {
        self.stats = InputStats::default();
        self.destruction = None;

        Self::walk(scene, input)?;
        Self::select_hotbar(scene, player)?;

        if scene.take_signal(signal::key(Scancode::E.0)) != 0 {
            self.screen.toggle();
            self.target = None;
            self.hold_units = 0.0;
        }
        if self.screen.is_open() {
            self.screen.update(scene, input, player)?;
            return Ok(());
        }

        let camera = scene.get::<Position>(player)?.0;
        let cell = world.cell_at(input.mouse_world(camera));

        if scene.take_signal(RIGHT_CLICK_DOWN) != 0 {
            self.try_place(scene, world, player, cell)?;
        }

        self.update_breaking(scene, world, input, cell, delta)
    }

    // ========================================================================
    // Player control
    // ========================================================================

    fn walk(scene: &mut Scene, input: &Input) -> Result<(), WorldError> {
        let right = input.key(Scancode::D);
        let left = input.key(Scancode::A);
        if !right && !left {
            return Ok(());
        }

        let players = scene.view::<(Velocity, Tags)>();
        for entity in players.iter() {
            if !scene.get::<Tags>(entity)?.has(Tags::PLAYER) {
                continue;
            }

            let velocity = &mut scene.get_mut::<Velocity>(entity)?.0;
            if right && velocity.x < WALK_LIMIT {
                velocity.x += WALK_IMPULSE;
            }
            if left && velocity.x > -WALK_LIMIT {
                velocity.x -= WALK_IMPULSE;
            }
        }

        Ok(())
    }

    fn select_hotbar(scene: &mut Scene, player: EntityId) -> Result<(), WorldError> {
        for (slot, key) in Scancode::HOTBAR.into_iter().enumerate() {
            if scene.take_signal(signal::key(key.0)) != 0 {
                scene.get_mut::<Inventory>(player)?.select(slot);
                log::trace!("Selected hotbar slot {slot}");
            }
        }
        Ok(())
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Place the player's selected block at `cell`.
    ///
    /// Returns `None` without side effects when the cell holds a block, when
    /// a collision box overlaps the new block, or when the selected slot does
    /// not hold a block item.
    ///
    /// # Errors
    ///
    /// Fails if `player` has no inventory or the block cannot be spawned.
    pub fn try_place(
        &mut self,
        scene: &mut Scene,
        world: &mut World,
        player: EntityId,
        cell: IVec2,
    ) -> Result<Option<EntityId>, WorldError> {
        let blocks = scene.view::<(Block,)>();
        for entity in blocks.iter() {
            if scene.get::<Block>(entity)?.cell == cell {
                return Ok(None);
            }
        }

        let size = world.block_size;
        let footprint = Aabb::from_origin_size(
            cell.as_vec2() * size + Vec2::splat(PLACE_INSET * size),
            Vec2::splat(PLACE_EXTENT * size),
        );

        let bodies = scene.view::<(Position, Collision)>();
        for entity in bodies.iter() {
            let aabb = scene.get::<Collision>(entity)?.aabb(scene.get::<Position>(entity)?.0);
            if aabb.intersects(&footprint) {
                log::trace!("Placement at {cell} blocked by {entity}");
                return Ok(None);
            }
        }

        let inventory = scene.get_mut::<Inventory>(player)?;
        let Some(kind) = inventory.selected_item().filter(|item| item.is_block()) else {
            return Ok(None);
        };
        inventory.take_selected();

        let block = world.spawn_block(scene, kind, cell)?;
        scene.set_signal(PHYSICS_DIRTY, 1);
        self.stats.placed += 1;
        log::debug!("Placed {kind} at {cell}");
        Ok(Some(block))
    }

    // ========================================================================
    // Breaking
    // ========================================================================

    fn update_breaking(
        &mut self,
        scene: &mut Scene,
        world: &mut World,
        input: &Input,
        cell: IVec2,
        delta: f32,
    ) -> Result<(), WorldError> {
        if !input.button(MouseButton::Left) {
            self.hold_units = 0.0;
            return Ok(());
        }

        if self.target != Some(cell) {
            self.hold_units = 0.0;
        }
        self.target = Some(cell);
        self.hold_units += delta * UNITS_PER_SECOND;

        if self.hold_units < ACTIVATION_UNITS {
            return Ok(());
        }

        let blocks = scene.view::<(Block,)>();
        let Some(entity) = blocks
            .iter()
            .find(|&entity| scene.get::<Block>(entity).is_ok_and(|block| block.cell == cell))
        else {
            return Ok(());
        };

        let kind = scene.get::<Block>(entity)?.kind;
        let Some(break_time) = world.registry.break_time(kind) else {
            // Unbreakable
            return Ok(());
        };
        let break_time = break_time as f32;

        if self.hold_units < break_time {
            let stage = (self.hold_units / break_time * STAGES) as u8;
            self.destruction = Some(Destruction { cell, stage });
            return Ok(());
        }

        self.break_block(scene, world, entity, kind, cell)?;
        self.hold_units = 0.0;
        Ok(())
    }

    fn break_block(
        &mut self,
        scene: &mut Scene,
        world: &mut World,
        entity: EntityId,
        kind: Item,
        cell: IVec2,
    ) -> Result<(), WorldError> {
        let position = world.drop_position(cell);
        for item in world.registry.roll_loot(kind, &mut self.rng) {
            world.spawn_item(scene, item, position)?;
            self.stats.dropped += 1;
            log::debug!("Dropped {item} at {position}");
        }

        scene.erase(entity)?;
        scene.set_signal(PHYSICS_DIRTY, 1);
        self.stats.broken += 1;
        log::debug!("Broke {kind} at {cell}");
        Ok(())
    }
}
