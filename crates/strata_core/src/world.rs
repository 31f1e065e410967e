//! World container for entities
//!
//! The World owns the entity allocator, the transform store, replication
//! flags, and optionally a physics world, and runs a tick in the fixed
//! order: physics reconciliation and step, then the matrix pass from every
//! root.

use strata_physics::{BodyKey, PhysicsConfig, PhysicsWorld, RigidBody};

use crate::matrix::DirtyFlagPolicy;
use crate::physics_sync::{ContactListener, PhysicsSync, SyncStats};
use crate::{Entity, EntityAllocator, NetworkAuthority, SceneError, TransformStore};

/// The scene: entities, their transforms, and the physics they drive
pub struct World {
    entities: EntityAllocator,
    transforms: TransformStore,
    authority: NetworkAuthority,
    physics_sync: PhysicsSync,
    /// Optional physics simulation (None = no physics)
    physics_world: Option<PhysicsWorld>,
}

impl World {
    /// Create a world with room for `capacity` ids, including the reserved 0
    pub fn new(capacity: usize) -> Self {
        Self {
            entities: EntityAllocator::new(capacity),
            transforms: TransformStore::new(capacity),
            authority: NetworkAuthority::new(capacity),
            physics_sync: PhysicsSync::new(capacity),
            physics_world: None,
        }
    }

    pub fn with_dirty_policy(mut self, policy: DirtyFlagPolicy) -> Self {
        self.transforms.set_dirty_policy(policy);
        self
    }

    /// Enable physics for this world
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.physics_world = Some(PhysicsWorld::with_config(config));
        self
    }

    pub fn capacity(&self) -> usize {
        self.transforms.capacity()
    }

    pub fn transforms(&self) -> &TransformStore {
        &self.transforms
    }

    pub fn transforms_mut(&mut self) -> &mut TransformStore {
        &mut self.transforms
    }

    pub fn authority(&self) -> &NetworkAuthority {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut NetworkAuthority {
        &mut self.authority
    }

    /// Get the physics world (if enabled)
    pub fn physics(&self) -> Option<&PhysicsWorld> {
        self.physics_world.as_ref()
    }

    /// Get mutable physics world (if enabled)
    pub fn physics_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.physics_world.as_mut()
    }

    pub fn physics_sync(&self) -> &PhysicsSync {
        &self.physics_sync
    }

    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Live entities in id order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    /// Allocate an entity with a default transform record
    pub fn spawn(&mut self) -> Result<Entity, SceneError> {
        let entity = self.entities.allocate()?;
        self.transforms.initialize(entity)?;
        log::trace!("spawned {}", entity);
        Ok(entity)
    }

    /// Spawn an entity and attach it under `parent`
    pub fn spawn_child(&mut self, parent: Entity) -> Result<Entity, SceneError> {
        if !self.transforms.contains(parent) {
            return Err(SceneError::NotInitialized(parent));
        }
        let entity = self.spawn()?;
        self.transforms.attach(parent, entity)?;
        Ok(entity)
    }

    /// Remove an entity
    ///
    /// The entity is detached from its parent and its children become roots.
    /// Any rigid body is queued for removal on the next tick.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), SceneError> {
        if !self.entities.is_alive(entity) {
            return Err(SceneError::NotInitialized(entity));
        }

        let parent = self.transforms.parent(entity)?;
        if !parent.is_noop() {
            self.transforms.detach(parent, entity)?;
        }

        let children: Vec<Entity> = self.transforms.children(entity)?.collect();
        for child in children {
            self.transforms.detach(entity, child)?;
        }

        self.physics_sync.links_mut().remove(entity);
        self.authority.clear(entity)?;
        self.transforms.reset(entity)?;
        self.entities.release(entity);

        log::trace!("despawned {}", entity);
        Ok(())
    }

    /// Add `body` to the simulation and associate it with `entity`
    ///
    /// The body is positioned from the transform on the next tick.
    pub fn add_rigid_body(&mut self, entity: Entity, body: RigidBody) -> Result<BodyKey, SceneError> {
        if !self.transforms.contains(entity) {
            return Err(SceneError::NotInitialized(entity));
        }
        let physics = self.physics_world.as_mut().ok_or(SceneError::PhysicsDisabled)?;

        let key = physics.add_body(body);
        self.physics_sync.links_mut().insert(entity, key)?;
        Ok(key)
    }

    /// Drop the entity's body association; the body leaves the simulation
    /// on the next tick
    pub fn remove_rigid_body(&mut self, entity: Entity) -> Option<BodyKey> {
        self.physics_sync.links_mut().remove(entity)
    }

    pub fn rigid_body(&self, entity: Entity) -> Option<BodyKey> {
        self.physics_sync.links().get(entity)
    }

    pub fn entity_for_body(&self, key: BodyKey) -> Option<Entity> {
        self.physics_sync.entity_for_body(key)
    }

    /// Lazy matrix pass from every root
    pub fn update_matrices(&mut self) -> Result<(), SceneError> {
        let roots: Vec<Entity> = self.transforms.roots().collect();
        for root in roots {
            self.transforms.update_world_lazy(root, false)?;
        }
        Ok(())
    }

    /// Run one tick: physics reconciliation and step (if enabled), then the
    /// matrix pass
    pub fn update<L>(&mut self, dt: f32, listener: &mut L) -> Result<SyncStats, SceneError>
    where
        L: ContactListener + ?Sized,
    {
        let stats = match self.physics_world {
            Some(ref mut physics) => self.physics_sync.tick(
                &mut self.transforms,
                &self.authority,
                physics,
                dt,
                listener,
            )?,
            None => SyncStats::default(),
        };

        self.update_matrices()?;
        Ok(stats)
    }
}
