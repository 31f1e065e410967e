//! Unit quaternion for 3D rotations
//!
//! Stored as `(x, y, z, w)` with `w` the scalar part. Multiplication follows the
//! Hamilton convention: `a * b` applies `b` first, then `a`.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::mat4::Mat4;
use crate::Vec3;

/// Quaternion with x, y, z (vector part) and w (scalar part)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity rotation
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around a (not necessarily unit) axis
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Extract the rotation from the upper 3x3 of a matrix.
    ///
    /// The basis columns are divided by their lengths first, so matrices that
    /// carry a (non-zero) scale are accepted.
    pub fn from_rotation_matrix(m: &Mat4) -> Self {
        let sx = Vec3::new(m[0][0], m[0][1], m[0][2]).length();
        let sy = Vec3::new(m[1][0], m[1][1], m[1][2]).length();
        let sz = Vec3::new(m[2][0], m[2][1], m[2][2]).length();
        let inv = |s: f32| if s > 0.0 { 1.0 / s } else { 0.0 };
        let (ix, iy, iz) = (inv(sx), inv(sy), inv(sz));

        // mRC: row R, column C
        let m11 = m[0][0] * ix;
        let m21 = m[0][1] * ix;
        let m31 = m[0][2] * ix;
        let m12 = m[1][0] * iy;
        let m22 = m[1][1] * iy;
        let m32 = m[1][2] * iy;
        let m13 = m[2][0] * iz;
        let m23 = m[2][1] * iz;
        let m33 = m[2][2] * iz;

        let trace = m11 + m22 + m33;

        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self::new((m32 - m23) * s, (m13 - m31) * s, (m21 - m12) * s, 0.25 / s)
        } else if m11 > m22 && m11 > m33 {
            let s = 2.0 * (1.0 + m11 - m22 - m33).sqrt();
            Self::new(0.25 * s, (m12 + m21) / s, (m13 + m31) / s, (m32 - m23) / s)
        } else if m22 > m33 {
            let s = 2.0 * (1.0 + m22 - m11 - m33).sqrt();
            Self::new((m12 + m21) / s, 0.25 * s, (m23 + m32) / s, (m13 - m31) / s)
        } else {
            let s = 2.0 * (1.0 + m33 - m11 - m22).sqrt();
            Self::new((m13 + m31) / s, (m23 + m32) / s, 0.25 * s, (m21 - m12) / s)
        }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalize to unit length; a zero quaternion becomes the identity
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            let inv = 1.0 / len;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse. A zero quaternion has no inverse and yields zero.
    pub fn inverse(self) -> Self {
        let dot = self.dot(self);
        if dot == 0.0 {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }
        let inv = 1.0 / dot;
        Self::new(-self.x * inv, -self.y * inv, -self.z * inv, self.w * inv)
    }

    /// Rotate a vector by this (unit) quaternion
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Advance the orientation by an angular velocity (radians/second) over `dt`
    pub fn integrated(self, angular_velocity: Vec3, dt: f32) -> Self {
        let omega = Self::new(angular_velocity.x, angular_velocity.y, angular_velocity.z, 0.0);
        let spin = omega * self;
        let half_dt = 0.5 * dt;
        Self::new(
            self.x + spin.x * half_dt,
            self.y + spin.y * half_dt,
            self.z + spin.z * half_dt,
            self.w + spin.w * half_dt,
        )
        .normalized()
    }

    /// Returns true if both quaternions describe the same rotation within `epsilon`
    pub fn approx_same_rotation(self, other: Self, epsilon: f32) -> bool {
        (1.0 - self.dot(other).abs()) < epsilon
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;

    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.x * b.w + a.w * b.x + a.y * b.z - a.z * b.y,
            a.y * b.w + a.w * b.y + a.z * b.x - a.x * b.z,
            a.z * b.w + a.w * b.z + a.x * b.y - a.y * b.x,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mat4;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity_rotate() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(Quat::IDENTITY.rotate(v), v));
    }

    #[test]
    fn test_axis_angle_rotate() {
        let q = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let r = q.rotate(Vec3::X);
        assert!(vec_approx_eq(r, Vec3::Y), "X around Z by 90 should be Y, got {:?}", r);
    }

    #[test]
    fn test_mul_applies_right_first() {
        let about_z = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let about_x = Quat::from_axis_angle(Vec3::X, FRAC_PI_2);
        // X -> (Z) -> Y -> (X) -> Z
        let r = (about_x * about_z).rotate(Vec3::X);
        assert!(vec_approx_eq(r, Vec3::Z), "got {:?}", r);
    }

    #[test]
    fn test_inverse_undoes_rotation() {
        let q = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.7);
        let v = Vec3::new(0.3, -2.0, 5.0);
        let back = q.inverse().rotate(q.rotate(v));
        assert!(vec_approx_eq(back, v));
    }

    #[test]
    fn test_inverse_of_zero_is_zero() {
        let zero = Quat::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(zero.inverse(), zero);
    }

    #[test]
    fn test_from_rotation_matrix_round_trip() {
        let axes = [
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            Vec3::new(1.0, -2.0, 0.5),
        ];
        for axis in axes {
            for angle in [0.3f32, 1.5, 2.9, -2.2] {
                let q = Quat::from_axis_angle(axis, angle);
                let m = mat4::from_quat(q);
                let back = Quat::from_rotation_matrix(&m);
                assert!(
                    q.approx_same_rotation(back, EPSILON),
                    "axis {:?} angle {}: {:?} vs {:?}", axis, angle, q, back
                );
            }
        }
    }

    #[test]
    fn test_from_rotation_matrix_ignores_scale() {
        let q = Quat::from_axis_angle(Vec3::Y, 0.8);
        let m = mat4::from_rotation_translation_scale(q, Vec3::new(4.0, 5.0, 6.0), Vec3::new(2.0, 3.0, 0.5));
        let back = Quat::from_rotation_matrix(&m);
        assert!(q.approx_same_rotation(back, EPSILON));
    }

    #[test]
    fn test_integrated_quarter_turn() {
        let mut q = Quat::IDENTITY;
        // 90 degrees/second around Y, integrated in small steps
        for _ in 0..1000 {
            q = q.integrated(Vec3::new(0.0, FRAC_PI_2, 0.0), 0.001);
        }
        let expected = Quat::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert!(q.approx_same_rotation(expected, 0.001), "got {:?}", q);
    }
}
