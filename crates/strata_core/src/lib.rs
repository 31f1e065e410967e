//! Core types for the Strata transform hierarchy
//!
//! This crate provides the scene graph and everything that keeps it in step:
//!
//! - [`Entity`] / [`EntityAllocator`] - integer ids, 0 reserved as NOOP
//! - [`TransformStore`] - columnar per-entity transform and tree-link storage
//! - scene graph operations ([`TransformStore::attach`], [`TransformStore::traverse`], ...)
//! - matrix pipeline ([`TransformStore::update_world_lazy`] and friends)
//! - [`NetworkAuthority`] - replication flags deciding transform authority
//! - [`PhysicsSync`] - per-tick reconciliation with the physics world
//! - [`World`] - owns all of the above and runs a tick

mod entity;
mod error;
mod transform;
mod hierarchy;
mod matrix;
mod rotation;
mod network;
mod physics_sync;
mod world;

pub use entity::{Entity, EntityAllocator};
pub use error::SceneError;
pub use transform::TransformStore;
pub use hierarchy::Children;
pub use matrix::DirtyFlagPolicy;
pub use network::{NetworkAuthority, Replication};
pub use physics_sync::{
    ContactListener, EntityContact, IgnoreContacts, PhysicsSync, RigidBodyLinks, SyncStats,
};
pub use world::World;

// Re-export commonly used types for convenience
pub use strata_math::{Euler, EulerOrder, Mat4, Quat, Vec3};
pub use strata_physics::{
    BodyKey, CollisionFilter, ContactPhase, PhysicsConfig, PhysicsWorld, RigidBody,
};
