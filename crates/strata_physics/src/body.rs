//! Rigid body types for physics simulation

use crate::collision::CollisionFilter;
use crate::shapes::{Aabb, Collider, Sphere};
use strata_math::{Quat, Vec3};
use slotmap::new_key_type;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing so a key to a removed body never resolves to
    /// a body that later reuses the same slot.
    pub struct BodyKey;
}

/// A rigid body with position, orientation, velocity, and collision shape
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Position in world coordinates
    pub position: Vec3,
    /// Orientation in world coordinates
    pub rotation: Quat,
    /// Linear velocity (units per second)
    pub velocity: Vec3,
    /// Angular velocity (radians per second, world axes)
    pub angular_velocity: Vec3,
    /// Mass of the body (used for push calculations)
    pub mass: f32,
    /// Coefficient of restitution (bounciness, 0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
    /// Whether this body is affected by gravity
    pub affected_by_gravity: bool,
    /// The collision shape for this body (stores absolute world position)
    pub collider: Collider,
    /// Whether this body is static (static bodies don't move)
    pub is_static: bool,
    /// Layer/mask filtering for this body
    pub filter: CollisionFilter,
}

impl RigidBody {
    fn with_collider(position: Vec3, collider: Collider) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            restitution: 0.0,
            affected_by_gravity: true,
            collider,
            is_static: false,
            filter: CollisionFilter::default(),
        }
    }

    /// Create a new rigid body with a sphere collider
    pub fn new_sphere(position: Vec3, radius: f32) -> Self {
        Self::with_collider(position, Collider::Sphere(Sphere::new(position, radius)))
    }

    /// Create a new rigid body with an AABB collider
    pub fn new_aabb(position: Vec3, half_extents: Vec3) -> Self {
        Self::with_collider(
            position,
            Collider::Aabb(Aabb::from_center_half_extents(position, half_extents)),
        )
    }

    /// Create a static body that doesn't move
    pub fn new_static_aabb(position: Vec3, half_extents: Vec3) -> Self {
        Self::new_aabb(position, half_extents)
            .with_static(true)
            .with_filter(CollisionFilter::static_world())
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the restitution (bounciness), clamped to [0, 1]
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    /// Set whether this body is static. Static bodies ignore gravity.
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        if is_static {
            self.affected_by_gravity = false;
        }
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Current translation
    pub fn translation(&self) -> Vec3 {
        self.position
    }

    /// Teleport the body and keep the collider in sync
    pub fn set_translation(&mut self, position: Vec3) {
        let delta = position - self.position;
        self.position = position;
        self.collider = self.collider.translated(delta);
    }

    /// Current orientation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Overwrite the orientation (normalized on write)
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalized();
    }

    /// Apply a positional correction (e.g., from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec3) {
        self.position += correction;
        self.collider = self.collider.translated(correction);
    }
}
