//! Engine configuration
//!
//! Loaded from RON; every field is optional and falls back to its default.
//! Loaded configs are validated before use.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::physics::PhysicsConfig;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Initial viewport width
    pub width: u32,
    /// Initial viewport height
    pub height: u32,
    /// Upper bound on the frame step in seconds
    pub max_delta: f32,
    /// Edge length of a grid cell in pixels
    pub block_size: f32,
    /// Terrain and loot seed
    pub seed: u64,
    pub physics: PhysicsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Tessera"),
            width: 800,
            height: 600,
            max_delta: 0.05,
            block_size: 32.0,
            seed: 0,
            physics: PhysicsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the frame step bound
    #[must_use]
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Set the grid cell size
    #[must_use]
    pub fn with_block_size(mut self, block_size: f32) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the world seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the physics constants
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Physics constants with the engine's step bound applied
    #[must_use]
    pub fn physics(&self) -> PhysicsConfig {
        self.physics.clone().with_max_delta(self.max_delta)
    }

    /// Check the values the simulation divides by or clamps against.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_delta", self.max_delta)?;
        positive("block_size", self.block_size)?;
        positive("physics.max_delta", self.physics.max_delta)?;
        if !self.physics.pickup_range.is_finite() || self.physics.pickup_range < 0.0 {
            return Err(ConfigError::Invalid {
                field: "physics.pickup_range",
                value: self.physics.pickup_range,
            });
        }
        Ok(())
    }

    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_ron_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Render the config as pretty RON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, value })
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO error
    Io(String),
    /// Malformed config
    Parse(String),
    /// Well-formed but unusable value
    Invalid { field: &'static str, value: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse(e) => write!(f, "Config parse error: {e}"),
            Self::Invalid { field, value } => write!(f, "Invalid config value {field} = {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}
