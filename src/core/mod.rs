//! Core engine module
//!
//! Contains the Engine, its configuration, frame timing and world snapshots

mod config;
mod debug;
mod engine;
mod snapshot;
mod time;

pub use config::{ConfigError, EngineConfig};
pub use debug::{FrameCounters, FrameStats};
pub use engine::{Engine, EngineError, EventSource, ScriptedEvents};
pub use snapshot::{BlockSnapshot, ItemSnapshot, PlayerSnapshot, SNAPSHOT_VERSION, SnapshotError, WorldSnapshot};
pub use time::{Time, clamp_delta};
