//! Transform <-> rigid body reconciliation
//!
//! [`RigidBodyLinks`] records which entities carry a rigid body and queues
//! the entered/exited transitions. [`PhysicsSync`] consumes those queues
//! once per tick, moves state between the transform store and the physics
//! world according to network authority, steps the simulation, and hands
//! contact events to a [`ContactListener`] with bodies resolved to entities.

use slotmap::SecondaryMap;
use strata_physics::{BodyKey, ContactPhase, PhysicsWorld, RigidBody};

use crate::{Entity, NetworkAuthority, SceneError, TransformStore};

/// Entity -> body association with change tracking
#[derive(Debug, Clone, Default)]
pub struct RigidBodyLinks {
    bodies: Vec<Option<BodyKey>>,
    entered: Vec<Entity>,
    exited: Vec<(Entity, BodyKey)>,
}

impl RigidBodyLinks {
    pub fn new(capacity: usize) -> Self {
        Self {
            bodies: vec![None; capacity],
            entered: Vec::new(),
            exited: Vec::new(),
        }
    }

    pub fn get(&self, entity: Entity) -> Option<BodyKey> {
        self.bodies.get(entity.index()).copied().flatten()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Associate `key` with `entity`. A replaced body is queued as exited;
    /// re-inserting the current key queues nothing.
    pub fn insert(&mut self, entity: Entity, key: BodyKey) -> Result<Option<BodyKey>, SceneError> {
        let capacity = self.bodies.len();
        let slot = self
            .bodies
            .get_mut(entity.index())
            .ok_or(SceneError::OutOfRange { entity, capacity })?;

        if *slot == Some(key) {
            return Ok(Some(key));
        }

        let previous = slot.replace(key);
        if let Some(old) = previous {
            self.exited.push((entity, old));
        }
        self.entered.push(entity);
        Ok(previous)
    }

    /// Drop the association, queueing an exit for the removed body
    pub fn remove(&mut self, entity: Entity) -> Option<BodyKey> {
        let key = self.bodies.get_mut(entity.index())?.take()?;
        self.exited.push((entity, key));
        Some(key)
    }

    /// Associated entities in id order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, BodyKey)> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, key)| key.map(|key| (Entity::from_raw(i as u32), key)))
    }

    pub fn len(&self) -> usize {
        self.bodies.iter().filter(|key| key.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.iter().all(Option::is_none)
    }

    pub fn has_pending(&self) -> bool {
        !self.entered.is_empty() || !self.exited.is_empty()
    }

    fn take_entered(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.entered)
    }

    fn take_exited(&mut self) -> Vec<(Entity, BodyKey)> {
        std::mem::take(&mut self.exited)
    }
}

/// A contact event with both bodies resolved to entities where possible
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityContact {
    pub first: Option<Entity>,
    pub second: Option<Entity>,
    pub phase: ContactPhase,
}

/// Receives contact notifications after each physics step
pub trait ContactListener {
    fn on_contact(&mut self, contact: EntityContact);
}

impl<F> ContactListener for F
where
    F: FnMut(EntityContact),
{
    fn on_contact(&mut self, contact: EntityContact) {
        self(contact)
    }
}

/// Listener that discards every contact
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreContacts;

impl ContactListener for IgnoreContacts {
    fn on_contact(&mut self, _contact: EntityContact) {}
}

/// Counters from one reconciliation pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub entered: usize,
    pub exited: usize,
    /// Transforms written into bodies
    pub pushed: usize,
    /// Bodies read back into transforms
    pub pulled: usize,
    /// Associations whose body no longer exists
    pub missed: usize,
}

/// Per-tick bridge between the transform store and the physics world
#[derive(Debug, Clone, Default)]
pub struct PhysicsSync {
    links: RigidBodyLinks,
    handles: SecondaryMap<BodyKey, Entity>,
}

impl PhysicsSync {
    pub fn new(capacity: usize) -> Self {
        Self {
            links: RigidBodyLinks::new(capacity),
            handles: SecondaryMap::new(),
        }
    }

    pub fn links(&self) -> &RigidBodyLinks {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut RigidBodyLinks {
        &mut self.links
    }

    /// Reverse lookup recorded when the association entered
    pub fn entity_for_body(&self, key: BodyKey) -> Option<Entity> {
        self.handles.get(key).copied()
    }

    /// Reconcile, step the simulation by `dt`, then dispatch contacts
    pub fn tick<L>(
        &mut self,
        transforms: &mut TransformStore,
        authority: &NetworkAuthority,
        physics: &mut PhysicsWorld,
        dt: f32,
        listener: &mut L,
    ) -> Result<SyncStats, SceneError>
    where
        L: ContactListener + ?Sized,
    {
        let stats = self.reconcile(transforms, authority, physics)?;
        physics.step(dt);
        self.dispatch_contacts(physics, listener);
        Ok(stats)
    }

    /// Handle exited, then entered, then every associated entity
    pub fn reconcile(
        &mut self,
        transforms: &mut TransformStore,
        authority: &NetworkAuthority,
        physics: &mut PhysicsWorld,
    ) -> Result<SyncStats, SceneError> {
        let mut stats = SyncStats::default();

        for (entity, key) in self.links.take_exited() {
            self.handles.remove(key);
            if physics.remove_body(key).is_none() {
                log::trace!("exit: body for {} was already gone", entity);
            }
            log::debug!("{} left physics", entity);
            stats.exited += 1;
        }

        for entity in self.links.take_entered() {
            transforms.set_quaternion_from_euler(entity)?;

            let Some(key) = self.links.get(entity) else {
                log::trace!("enter: {} lost its body before reconciliation", entity);
                stats.missed += 1;
                continue;
            };
            let Some(body) = physics.get_body_mut(key) else {
                log::trace!("enter: no body for {}", entity);
                stats.missed += 1;
                continue;
            };

            push_transform(transforms, entity, body)?;
            self.handles.insert(key, entity);
            log::debug!("{} entered physics", entity);
            stats.entered += 1;
        }

        for (entity, key) in self.links.iter() {
            let Some(body) = physics.get_body_mut(key) else {
                log::trace!("steady: no body for {}", entity);
                stats.missed += 1;
                continue;
            };

            if authority.transform_is_authoritative(entity) {
                push_transform(transforms, entity, body)?;
                stats.pushed += 1;
            } else {
                pull_body(body, transforms, entity)?;
                stats.pulled += 1;
            }
        }

        Ok(stats)
    }

    /// Drain contact events and forward the ones touching a known entity
    pub fn dispatch_contacts<L>(&self, physics: &mut PhysicsWorld, listener: &mut L) -> usize
    where
        L: ContactListener + ?Sized,
    {
        let mut delivered = 0;
        for event in physics.drain_contact_events() {
            let contact = EntityContact {
                first: self.entity_for_body(event.first),
                second: self.entity_for_body(event.second),
                phase: event.phase,
            };
            if contact.first.is_none() && contact.second.is_none() {
                log::debug!("contact between unmapped bodies ignored");
                continue;
            }
            listener.on_contact(contact);
            delivered += 1;
        }
        delivered
    }
}

fn push_transform(
    transforms: &TransformStore,
    entity: Entity,
    body: &mut RigidBody,
) -> Result<(), SceneError> {
    body.set_translation(transforms.position(entity)?);
    body.set_rotation(transforms.quaternion(entity)?);
    Ok(())
}

fn pull_body(
    body: &RigidBody,
    transforms: &mut TransformStore,
    entity: Entity,
) -> Result<(), SceneError> {
    transforms.set_position(entity, body.translation())?;
    transforms.set_quaternion(entity, body.rotation())?;
    Ok(())
}
