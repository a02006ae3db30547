//! Entity Component System module
//!
//! Sparse-set component storage with cached multi-component views.

mod component;
pub mod components;
mod entity;
mod error;
mod pool;
mod scene;
pub mod signal;
mod view;

pub use component::{Component, ComponentId, ComponentManager};
pub use components::{Block, Collision, ItemDrop, Position, Sprite, Tags, Velocity};
pub use entity::{EntityId, EntityManager};
pub use error::EcsError;
pub use pool::{ErasedPool, SparseSet};
pub use scene::Scene;
pub use signal::SignalId;
pub use view::{Query, View, ViewCache, ViewKey};
