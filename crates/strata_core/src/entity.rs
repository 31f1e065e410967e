//! Entity ids and id allocation
//!
//! An entity is a plain index into every per-entity column. Id 0 is the
//! [`Entity::NOOP`] sentinel used by relation fields to mean "none"; it is
//! never handed out by the allocator.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::SceneError;

/// Index of an entity in all per-entity arrays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(u32);

impl Entity {
    /// "No relation" sentinel
    pub const NOOP: Self = Entity(0);

    #[inline]
    pub const fn from_raw(id: u32) -> Self {
        Entity(id)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into per-entity columns
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_noop(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out entity ids in `1..capacity`, recycling released ids
#[derive(Debug, Clone)]
pub struct EntityAllocator {
    alive: Vec<bool>,
    next: u32,
    free: Vec<Entity>,
    count: usize,
}

impl EntityAllocator {
    /// Create an allocator for `capacity` slots; slot 0 is reserved
    pub fn new(capacity: usize) -> Self {
        Self {
            alive: vec![false; capacity],
            next: 1,
            free: Vec::new(),
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.alive.len()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Allocate a fresh id, reusing the most recently released one first
    pub fn allocate(&mut self) -> Result<Entity, SceneError> {
        let entity = match self.free.pop() {
            Some(entity) => entity,
            None => {
                if self.next as usize >= self.alive.len() {
                    return Err(SceneError::CapacityExhausted { capacity: self.alive.len() });
                }
                let entity = Entity(self.next);
                self.next += 1;
                entity
            }
        };

        self.alive[entity.index()] = true;
        self.count += 1;
        Ok(entity)
    }

    /// Return an id to the pool. Returns false if it was not alive.
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.alive[entity.index()] = false;
        self.free.push(entity);
        self.count -= 1;
        true
    }

    /// Iterate over live entities in id order
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| Entity(i as u32))
    }
}
