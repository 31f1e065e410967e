//! Rigid-body physics for Strata
//!
//! This crate provides the simulation that the transform hierarchy syncs with:
//! - Collision shapes (spheres, AABBs)
//! - Collision detection with layer filtering
//! - Rigid body dynamics with gravity and angular velocity
//! - Discrete contact start/stop events keyed by [`BodyKey`]

pub mod body;
pub mod collision;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, RigidBody};
pub use collision::{aabb_vs_aabb, collide, sphere_vs_aabb, sphere_vs_sphere, CollisionFilter, CollisionLayer, Contact};
pub use shapes::{Aabb, Collider, Sphere};
pub use world::{ContactEvent, ContactPhase, PhysicsConfig, PhysicsWorld};
