//! Physics simulation module
//!
//! Axis-aligned boxes against a static block grid, with a uniform-grid
//! broad phase standing in for the all-pairs scan

mod aabb;
mod broadphase;
mod config;
mod system;

pub use aabb::Aabb;
pub use broadphase::BroadPhase;
pub use config::PhysicsConfig;
pub use system::{PhysicsStats, PhysicsSystem};
