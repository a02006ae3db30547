//! A 2D block-world engine built in Rust
//!
//! This engine provides:
//! - Sparse-set Entity Component System with cached, epoch-checked views
//! - Platformer physics against a block grid
//! - Block placement and breaking driven by per-frame input signals
//! - Seeded terrain, items, loot and inventories
//! - A renderer-agnostic draw pass and RON/JSON world snapshots

pub mod assets;
pub mod core;
pub mod ecs;
pub mod input;
pub mod physics;
pub mod render;
pub mod world;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::assets::{AssetLoader, Assets, HeadlessLoader};
    pub use crate::core::{Engine, EngineConfig, EventSource, FrameCounters, FrameStats, ScriptedEvents, WorldSnapshot};
    pub use crate::ecs::{Block, Collision, EntityId, ItemDrop, Position, Scene, Sprite, Tags, Velocity};
    pub use crate::input::{Input, InputEvent, MouseButton, Scancode};
    pub use crate::physics::{Aabb, PhysicsConfig};
    pub use crate::render::{DrawCommand, RecordingRenderer, Renderer};
    pub use crate::world::{Inventory, Item, Level, Registry, World};
    pub use glam::{IVec2, UVec2, Vec2};
}
