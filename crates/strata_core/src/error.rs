//! Error types for the transform hierarchy

use std::fmt;

use crate::Entity;

/// Error returned by transform, hierarchy, and world operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// Entity id is outside the fixed capacity of the store
    OutOfRange { entity: Entity, capacity: usize },
    /// The reserved NOOP id was used where a real entity is required
    ReservedEntity,
    /// Entity is not alive or has no transform
    NotInitialized(Entity),
    /// No free entity ids are left
    CapacityExhausted { capacity: usize },
    /// A physics operation was requested on a world without physics
    PhysicsDisabled,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::OutOfRange { entity, capacity } => {
                write!(f, "Entity {} is out of range (capacity {})", entity, capacity)
            }
            SceneError::ReservedEntity => write!(f, "Entity 0 is reserved and cannot join the hierarchy"),
            SceneError::NotInitialized(entity) => write!(f, "Entity {} has no transform", entity),
            SceneError::CapacityExhausted { capacity } => {
                write!(f, "All {} entity ids are in use", capacity)
            }
            SceneError::PhysicsDisabled => write!(f, "Physics is not enabled for this world"),
        }
    }
}

impl std::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = SceneError::OutOfRange { entity: Entity::from_raw(70), capacity: 64 };
        let msg = format!("{}", err);
        assert!(msg.contains("70"));
        assert!(msg.contains("64"));
    }

    #[test]
    fn test_reserved_display() {
        let msg = format!("{}", SceneError::ReservedEntity);
        assert!(msg.contains("reserved"));
    }
}
