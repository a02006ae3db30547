//! Errors raised by the entity and component layer

use super::entity::EntityId;

/// Errors that can occur during entity and component operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity does not have the requested component
    MissingComponent {
        /// Entity that was queried
        entity: EntityId,
        /// Type name of the missing component
        component: &'static str,
    },
    /// Entity id 0 was used; it is reserved and never issued
    ReservedEntity,
    /// The entity is not currently allocated (never issued or already released)
    InvalidEntity(EntityId),
}

impl std::fmt::Display for EcsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingComponent { entity, component } => {
                write!(f, "entity {entity} has no component {component}")
            }
            Self::ReservedEntity => write!(f, "entity 0 is reserved"),
            Self::InvalidEntity(entity) => write!(f, "entity {entity} is not allocated"),
        }
    }
}

impl std::error::Error for EcsError {}
