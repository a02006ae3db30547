//! Errors raised while spawning world content

use super::item::Item;
use crate::assets::AssetError;
use crate::ecs::EcsError;

/// Errors that can occur while spawning entities
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    /// Entity or component operation failed
    Ecs(EcsError),
    /// A texture could not be loaded
    Asset(AssetError),
    /// The registry has no texture for the item
    NoTexture(Item),
    /// The item cannot be placed as a block
    NotABlock(Item),
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ecs(e) => write!(f, "ECS error: {e}"),
            Self::Asset(e) => write!(f, "Asset error: {e}"),
            Self::NoTexture(item) => write!(f, "no texture registered for {item}"),
            Self::NotABlock(item) => write!(f, "{item} is not a block"),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ecs(e) => Some(e),
            Self::Asset(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EcsError> for WorldError {
    fn from(e: EcsError) -> Self {
        Self::Ecs(e)
    }
}

impl From<AssetError> for WorldError {
    fn from(e: AssetError) -> Self {
        Self::Asset(e)
    }
}
