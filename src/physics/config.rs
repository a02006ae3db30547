//! Physics tuning

use serde::{Deserialize, Serialize};

/// Physics constants. Distances are in pixels, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Upper bound on the integration step
    pub max_delta: f32,
    /// Downward acceleration
    pub gravity: f32,
    /// Vertical velocity set by a jump
    pub jump_impulse: f32,
    /// Horizontal velocity multiplier applied every step
    pub damping: f32,
    /// Entities moving up at least this fast are never grounded
    pub ground_velocity_cutoff: f32,
    /// Horizontal overlap below this does not count as standing on a block
    pub ground_inset: f32,
    /// Vertical slack of the ground check
    pub ground_tolerance: f32,
    /// Item pickup radius, in blocks
    pub pickup_range: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_delta: 0.05,
            gravity: 1200.0,
            jump_impulse: 600.0,
            damping: 0.7,
            ground_velocity_cutoff: 1.0,
            ground_inset: 6.0,
            ground_tolerance: 0.5,
            pickup_range: 1.0,
        }
    }
}

impl PhysicsConfig {
    /// Set the integration step bound
    #[must_use]
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Set gravity
    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the jump impulse
    #[must_use]
    pub fn with_jump_impulse(mut self, jump_impulse: f32) -> Self {
        self.jump_impulse = jump_impulse;
        self
    }

    /// Clamp a frame delta to the integration bound
    #[must_use]
    #[inline]
    pub fn clamp_delta(&self, delta: f32) -> f32 {
        crate::core::clamp_delta(delta, self.max_delta)
    }
}
