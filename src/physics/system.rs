//! Movement integration, block collision and item pickup
//!
//! One frame of physics is three passes, run in this order:
//!
//! 1. [`PhysicsSystem::update`]: ground detection, jumping, gravity, integration
//! 2. [`PhysicsSystem::collide`]: push movable boxes out of blocks
//! 3. [`PhysicsSystem::pick_up_items`]: move loose items into inventories
//!
//! Every pass walks an owned view snapshot and only mutates component values,
//! except pickup, which erases picked items and therefore re-checks liveness.

use glam::Vec2;
use rustc_hash::FxHashMap;

use super::aabb::Aabb;
use super::broadphase::{BroadPhase, live_aabb};
use super::config::PhysicsConfig;
use crate::ecs::signal::PHYSICS_DIRTY;
use crate::ecs::{Collision, EcsError, EntityId, ItemDrop, Position, Scene, Tags, Velocity};
use crate::input::{Input, Scancode};
use crate::world::Inventory;

/// Counters for the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicsStats {
    /// Entities integrated
    pub moved: usize,
    /// Entities found standing on a block
    pub grounded: usize,
    /// Ground checks answered by the last-block cache
    pub ground_cache_hits: usize,
    /// Push-backs applied
    pub resolved: usize,
    /// Items moved into inventories
    pub picked_up: usize,
}

/// Platformer physics against the block grid
#[derive(Debug)]
pub struct PhysicsSystem {
    config: PhysicsConfig,
    block_size: f32,
    broadphase: BroadPhase,
    /// Block each entity last stood on
    last_above: FxHashMap<EntityId, EntityId>,
    candidates: Vec<u32>,
    stats: PhysicsStats,
}

impl PhysicsSystem {
    /// Create a physics system for a grid of `block_size` cells
    #[must_use]
    pub fn new(config: PhysicsConfig, block_size: f32) -> Self {
        Self {
            config,
            block_size,
            broadphase: BroadPhase::new(block_size),
            last_above: FxHashMap::default(),
            candidates: Vec::new(),
            stats: PhysicsStats::default(),
        }
    }

    /// Physics constants in use
    #[must_use]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Counters since the last [`Self::update`]
    #[must_use]
    pub fn stats(&self) -> PhysicsStats {
        self.stats
    }

    /// Run all three passes
    ///
    /// # Errors
    ///
    /// Propagates component access errors from any pass.
    pub fn step(&mut self, scene: &mut Scene, input: &Input, delta: f32) -> Result<(), EcsError> {
        self.update(scene, input, delta)?;
        self.collide(scene)?;
        self.pick_up_items(scene)?;
        Ok(())
    }

    // ========================================================================
    // Integration
    // ========================================================================

    /// Integrate every `(Position, Velocity)` entity over `delta`.
    ///
    /// `delta` is clamped to [`PhysicsConfig::max_delta`] first.
    ///
    /// # Errors
    ///
    /// Propagates component access errors.
    pub fn update(&mut self, scene: &mut Scene, input: &Input, delta: f32) -> Result<(), EcsError> {
        let dt = self.config.clamp_delta(delta);
        self.stats = PhysicsStats::default();

        if scene.take_signal(PHYSICS_DIRTY) != 0 {
            self.last_above.clear();
        }
        self.sync(scene)?;

        let jump_pressed = input.key(Scancode::SPACE);

        let movers = scene.view::<(Position, Velocity)>();
        for entity in movers.iter() {
            let mut velocity = scene.get::<Velocity>(entity)?.0;

            let grounded = velocity.y < self.config.ground_velocity_cutoff && self.on_ground(scene, entity)?;

            if grounded {
                self.stats.grounded += 1;
                let can_jump = scene
                    .get::<Tags>(entity)
                    .is_ok_and(|tags| tags.has(Tags::JUMP));

                velocity.y = if can_jump && jump_pressed {
                    self.config.jump_impulse
                } else {
                    0.0
                };
            } else {
                velocity.y -= self.config.gravity * dt;
            }

            scene.get_mut::<Position>(entity)?.0 += velocity * dt;
            velocity.x *= self.config.damping;
            scene.get_mut::<Velocity>(entity)?.0 = velocity;

            self.stats.moved += 1;
        }

        Ok(())
    }

    /// Whether `entity` stands on any block, consulting the cache first.
    fn on_ground(&mut self, scene: &Scene, entity: EntityId) -> Result<bool, EcsError> {
        let Ok(collision) = scene.get::<Collision>(entity) else {
            return Ok(false);
        };
        let body = collision.aabb(scene.get::<Position>(entity)?.0);

        if let Some(&block) = self.last_above.get(&entity)
            && let Some(aabb) = live_aabb(scene, block, self.block_size)
            && self.rests_on(&body, &aabb)
        {
            self.stats.ground_cache_hits += 1;
            return Ok(true);
        }

        let area = Aabb::new(body.min - Vec2::new(0.0, self.config.ground_tolerance), body.max);
        self.broadphase.query(&area, &mut self.candidates);

        for &ordinal in &self.candidates {
            let (block, aabb) = self.broadphase.block(ordinal);
            if self.rests_on(&body, &aabb) {
                self.last_above.insert(entity, block);
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn rests_on(&self, body: &Aabb, block: &Aabb) -> bool {
        body.rests_on(block, self.config.ground_inset, self.config.ground_tolerance)
    }

    fn sync(&mut self, scene: &mut Scene) -> Result<(), EcsError> {
        if self.broadphase.is_stale(scene) {
            self.last_above
                .retain(|entity, block| scene.valid(*entity) && scene.valid(*block));
        }
        self.broadphase.sync(scene, self.block_size)
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Push every movable `(Collision, Position)` entity out of the blocks it
    /// overlaps, visiting blocks in view order. Returns the number of
    /// push-backs applied.
    ///
    /// # Errors
    ///
    /// Propagates component access errors.
    pub fn collide(&mut self, scene: &mut Scene) -> Result<usize, EcsError> {
        self.sync(scene)?;

        let mut resolved = 0;
        let bodies = scene.view::<(Collision, Position)>();
        for entity in bodies.iter() {
            let collision = *scene.get::<Collision>(entity)?;
            if collision.stationary {
                continue;
            }

            // Blocks before `next` were already visited for this entity
            let mut next = 0;
            loop {
                let body = collision.aabb(scene.get::<Position>(entity)?.0);
                self.broadphase.query(&body, &mut self.candidates);

                let hit = self
                    .candidates
                    .iter()
                    .copied()
                    .filter(|&ordinal| ordinal >= next)
                    .map(|ordinal| (ordinal, self.broadphase.block(ordinal).1))
                    .find(|(_, aabb)| body.intersects(aabb));

                let Some((ordinal, aabb)) = hit else {
                    break;
                };

                scene.get_mut::<Position>(entity)?.0 += body.minimum_translation(&aabb);
                resolved += 1;
                next = ordinal + 1;
            }
        }

        self.stats.resolved += resolved;
        Ok(resolved)
    }

    // ========================================================================
    // Item pickup
    // ========================================================================

    /// Move loose items within pickup range into the first inventory that
    /// accepts them, erasing the item entities. Returns the number picked up.
    ///
    /// # Errors
    ///
    /// Propagates component access errors.
    pub fn pick_up_items(&mut self, scene: &mut Scene) -> Result<usize, EcsError> {
        let range = self.config.pickup_range * self.block_size;
        let range_sq = range * range;

        let collectors = scene.view::<(Position, Inventory)>();
        let items = scene.view::<(Position, ItemDrop)>();

        let mut picked = 0;
        for item in items.iter() {
            let item_position = scene.get::<Position>(item)?.0;
            let kind = scene.get::<ItemDrop>(item)?.kind;

            for collector in collectors.iter() {
                let collector_position = scene.get::<Position>(collector)?.0;
                if item_position.distance_squared(collector_position) >= range_sq {
                    continue;
                }

                if scene.get_mut::<Inventory>(collector)?.try_pick(kind) {
                    scene.erase(item)?;
                    picked += 1;
                    log::debug!("{collector} picked up {kind}");
                    break;
                }
            }
        }

        self.stats.picked_up += picked;
        Ok(picked)
    }
}

// ============================================================================
// Tests
// ============================================================================
