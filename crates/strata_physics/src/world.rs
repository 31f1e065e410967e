//! Physics world and simulation

use crate::body::{BodyKey, RigidBody};
use crate::collision::{collide, Contact};
use strata_math::Vec3;
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity acceleration (applied to Y-axis, negative = down)
    pub gravity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { gravity: -9.81 }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }
}

/// Whether a pair of bodies began or stopped touching during a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactPhase {
    Started,
    Stopped,
}

/// A discrete contact transition between two bodies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub first: BodyKey,
    pub second: BodyKey,
    pub phase: ContactPhase,
}

/// The physics world containing all rigid bodies
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Pairs in contact at the end of the last step, in detection order
    touching: Vec<(BodyKey, BodyKey)>,
    /// Contact transitions not yet drained
    events: Vec<ContactEvent>,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            touching: Vec::new(),
            events: Vec::new(),
            config,
        }
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body from the world and return it
    ///
    /// Contacts involving the body are forgotten without a `Stopped` event.
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        let removed = self.bodies.remove(key)?;
        self.touching.retain(|&(a, b)| a != key && b != key);
        self.events.retain(|e| e.first != key && e.second != key);
        Some(removed)
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    pub fn contains_body(&self, key: BodyKey) -> bool {
        self.bodies.contains_key(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Take every contact transition recorded since the last drain
    pub fn drain_contact_events(&mut self) -> std::vec::Drain<'_, ContactEvent> {
        self.events.drain(..)
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs:
    /// 1. Gravity application to non-static bodies with gravity enabled
    /// 2. Velocity and angular velocity integration
    /// 3. Body-body collision detection and resolution
    /// 4. Contact start/stop event generation
    pub fn step(&mut self, dt: f32) {
        // Phase 1: Apply gravity and integrate velocity
        for (_key, body) in &mut self.bodies {
            if body.is_static {
                continue;
            }

            if body.affected_by_gravity {
                body.velocity.y += self.config.gravity * dt;
            }

            let displacement = body.velocity * dt;
            body.apply_correction(displacement);

            if body.angular_velocity != Vec3::ZERO {
                body.rotation = body.rotation.integrated(body.angular_velocity, dt);
            }
        }

        // Phase 2: Resolve body-body collisions
        let touching = self.resolve_body_collisions();

        // Phase 3: Emit transitions against the previous step
        for &(first, second) in &touching {
            if !self.touching.contains(&(first, second)) {
                self.events.push(ContactEvent { first, second, phase: ContactPhase::Started });
            }
        }
        for &(first, second) in &self.touching {
            if !touching.contains(&(first, second)) {
                self.events.push(ContactEvent { first, second, phase: ContactPhase::Stopped });
            }
        }

        self.touching = touching;
    }

    /// Resolve collisions between bodies, returning the pairs found in contact
    fn resolve_body_collisions(&mut self) -> Vec<(BodyKey, BodyKey)> {
        // Collect all keys first (needed because we can't iterate and mutate)
        let keys: Vec<BodyKey> = self.bodies.keys().collect();
        let mut touching = Vec::new();

        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let (key_a, key_b) = (keys[i], keys[j]);

                let contact = {
                    let body_a = &self.bodies[key_a];
                    let body_b = &self.bodies[key_b];

                    if body_a.is_static && body_b.is_static {
                        continue;
                    }
                    if !body_a.filter.collides_with(&body_b.filter) {
                        continue;
                    }

                    collide(&body_a.collider, &body_b.collider)
                };

                if let Some(contact) = contact.filter(Contact::is_colliding) {
                    self.resolve_body_pair_collision(key_a, key_b, &contact);
                    touching.push((key_a, key_b));
                }
            }
        }

        touching
    }

    /// Resolve collision between two specific bodies
    ///
    /// The contact normal points from B toward A.
    fn resolve_body_pair_collision(&mut self, key_a: BodyKey, key_b: BodyKey, contact: &Contact) {
        let (is_static_a, mass_a, restitution_a) = {
            let a = &self.bodies[key_a];
            (a.is_static, a.mass, a.restitution)
        };
        let (is_static_b, mass_b, restitution_b) = {
            let b = &self.bodies[key_b];
            (b.is_static, b.mass, b.restitution)
        };

        let push = contact.normal * contact.penetration;
        let (ratio_a, ratio_b) = if is_static_a {
            (0.0, 1.0)
        } else if is_static_b {
            (1.0, 0.0)
        } else {
            let total_mass = mass_a + mass_b;
            (mass_b / total_mass, mass_a / total_mass)
        };

        let restitution = restitution_a.max(restitution_b);

        if !is_static_a {
            let body = &mut self.bodies[key_a];
            body.apply_correction(push * ratio_a);
            reflect_velocity(&mut body.velocity, contact.normal, restitution);
        }
        if !is_static_b {
            let body = &mut self.bodies[key_b];
            body.apply_correction(-push * ratio_b);
            reflect_velocity(&mut body.velocity, -contact.normal, restitution);
        }
    }
}

/// Remove the velocity component heading against `normal`, bouncing by `restitution`
fn reflect_velocity(velocity: &mut Vec3, normal: Vec3, restitution: f32) {
    let along_normal = velocity.dot(normal);
    if along_normal < 0.0 {
        *velocity -= normal * (along_normal * (1.0 + restitution));
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
