//! Per-entity replication flags
//!
//! The network layer sets these; the physics bridge only reads them to pick
//! which side is authoritative for an entity's transform.

use bitflags::bitflags;

use crate::{Entity, SceneError};

bitflags! {
    /// Replication state of one entity
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Replication: u8 {
        /// Entity is replicated over the network
        const NETWORKED = 1 << 0;
        /// This peer owns the entity
        const OWNED = 1 << 1;
    }
}

impl Replication {
    /// Networked but owned by someone else: the transform carries remote
    /// state and must not be overwritten by local physics
    #[inline]
    pub fn is_remote(self) -> bool {
        self.contains(Replication::NETWORKED) && !self.contains(Replication::OWNED)
    }
}

/// Fixed-capacity table of [`Replication`] flags indexed by entity
#[derive(Debug, Clone)]
pub struct NetworkAuthority {
    flags: Vec<Replication>,
}

impl NetworkAuthority {
    pub fn new(capacity: usize) -> Self {
        Self {
            flags: vec![Replication::empty(); capacity],
        }
    }

    fn slot(&mut self, entity: Entity) -> Result<&mut Replication, SceneError> {
        let capacity = self.flags.len();
        self.flags
            .get_mut(entity.index())
            .ok_or(SceneError::OutOfRange { entity, capacity })
    }

    pub fn flags(&self, entity: Entity) -> Result<Replication, SceneError> {
        self.flags.get(entity.index()).copied().ok_or(SceneError::OutOfRange {
            entity,
            capacity: self.flags.len(),
        })
    }

    pub fn set_flags(&mut self, entity: Entity, flags: Replication) -> Result<(), SceneError> {
        *self.slot(entity)? = flags;
        Ok(())
    }

    pub fn set_networked(&mut self, entity: Entity, networked: bool) -> Result<(), SceneError> {
        self.slot(entity)?.set(Replication::NETWORKED, networked);
        Ok(())
    }

    pub fn set_owned(&mut self, entity: Entity, owned: bool) -> Result<(), SceneError> {
        self.slot(entity)?.set(Replication::OWNED, owned);
        Ok(())
    }

    /// Whether the transform, not the physics body, is authoritative
    ///
    /// Out-of-range ids are treated as local.
    pub fn transform_is_authoritative(&self, entity: Entity) -> bool {
        self.flags(entity).map(Replication::is_remote).unwrap_or(false)
    }

    pub fn clear(&mut self, entity: Entity) -> Result<(), SceneError> {
        self.set_flags(entity, Replication::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_rule() {
        let mut net = NetworkAuthority::new(4);
        let e = Entity::from_raw(1);
        assert!(!net.transform_is_authoritative(e));

        net.set_networked(e, true).unwrap();
        assert!(net.transform_is_authoritative(e));

        net.set_owned(e, true).unwrap();
        assert!(!net.transform_is_authoritative(e));

        net.set_networked(e, false).unwrap();
        assert!(!net.transform_is_authoritative(e));
        assert_eq!(net.flags(e).unwrap(), Replication::OWNED);
    }

    #[test]
    fn test_clear() {
        let mut net = NetworkAuthority::new(4);
        let e = Entity::from_raw(2);
        net.set_flags(e, Replication::NETWORKED).unwrap();
        net.clear(e).unwrap();
        assert!(net.flags(e).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range() {
        let mut net = NetworkAuthority::new(2);
        let e = Entity::from_raw(5);
        assert_eq!(
            net.set_owned(e, true),
            Err(SceneError::OutOfRange { entity: e, capacity: 2 })
        );
        assert!(!net.transform_is_authoritative(e));
    }
}
