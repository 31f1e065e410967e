//! 3D Mathematics Library
//!
//! This crate provides the vector, rotation, and matrix types used by the
//! Strata transform hierarchy.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - unit quaternion rotation
//! - [`Mat4`] - column-major 4x4 matrix plus free functions in [`mat4`]
//! - [`Euler`] / [`EulerOrder`] - order-aware Euler angles and conversions

mod vec3;
mod quat;
pub mod mat4;
pub mod euler;

pub use vec3::Vec3;
pub use quat::Quat;
pub use mat4::Mat4;
pub use euler::{Euler, EulerOrder, GIMBAL_LOCK_THRESHOLD};
