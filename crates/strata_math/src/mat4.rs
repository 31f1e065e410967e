//! 4x4 Matrix utilities for 3D affine transformations
//!
//! Matrices are column-major: `m[col][row]`. The translation lives in `m[3]`.

use crate::{Quat, Vec3};

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Pure rotation matrix from a unit quaternion
pub fn from_quat(q: Quat) -> Mat4 {
    from_rotation_translation_scale(q, Vec3::ZERO, Vec3::ONE)
}

/// Compose a TRS matrix: `T * R * S`
///
/// The rotated basis columns are scaled per axis, then the translation is
/// written into the last column.
pub fn from_rotation_translation_scale(q: Quat, t: Vec3, s: Vec3) -> Mat4 {
    let (x, y, z, w) = (q.x, q.y, q.z, q.w);
    let x2 = x + x;
    let y2 = y + y;
    let z2 = z + z;

    let xx = x * x2;
    let xy = x * y2;
    let xz = x * z2;
    let yy = y * y2;
    let yz = y * z2;
    let zz = z * z2;
    let wx = w * x2;
    let wy = w * y2;
    let wz = w * z2;

    [
        [(1.0 - (yy + zz)) * s.x, (xy + wz) * s.x, (xz - wy) * s.x, 0.0],
        [(xy - wz) * s.y, (1.0 - (xx + zz)) * s.y, (yz + wx) * s.y, 0.0],
        [(xz + wy) * s.z, (yz - wx) * s.z, (1.0 - (xx + yy)) * s.z, 0.0],
        [t.x, t.y, t.z, 1.0],
    ]
}

/// Orientation matrix whose local -Z axis points from `eye` toward `target`
///
/// The basis is stored in the columns (no translation), so the result is the
/// rotation an object at `eye` needs to face `target`; it is the inverse of a
/// camera view matrix. Degenerate inputs are nudged rather than rejected: a
/// zero eye-target distance faces +Z, and an `up` parallel to the view
/// direction is perturbed slightly.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let mut z = eye - target;
    if z.length_squared() == 0.0 {
        z.z = 1.0;
    }
    z = z.normalized();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        if up.z.abs() == 1.0 {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z = z.normalized();
        x = up.cross(z);
    }
    x = x.normalized();

    let y = z.cross(x);

    [
        [x.x, x.y, x.z, 0.0],
        [y.x, y.y, y.z, 0.0],
        [z.x, z.y, z.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Translation component of an affine matrix
#[inline]
pub fn get_translation(m: &Mat4) -> Vec3 {
    Vec3::new(m[3][0], m[3][1], m[3][2])
}

/// Length of each basis column
pub fn get_scaling(m: &Mat4) -> Vec3 {
    Vec3::new(
        Vec3::new(m[0][0], m[0][1], m[0][2]).length(),
        Vec3::new(m[1][0], m[1][1], m[1][2]).length(),
        Vec3::new(m[2][0], m[2][1], m[2][2]).length(),
    )
}

/// Transform a point (w = 1) by an affine matrix
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
        m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
    )
}

/// Transpose a matrix
pub fn transpose(m: Mat4) -> Mat4 {
    [
        [m[0][0], m[1][0], m[2][0], m[3][0]],
        [m[0][1], m[1][1], m[2][1], m[3][1]],
        [m[0][2], m[1][2], m[2][2], m[3][2]],
        [m[0][3], m[1][3], m[2][3], m[3][3]],
    ]
}

/// Element-wise comparison within `epsilon`
pub fn approx_eq(a: &Mat4, b: &Mat4, epsilon: f32) -> bool {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .all(|(x, y)| (x - y).abs() <= epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(transform_point(&IDENTITY, p), p));
    }

    #[test]
    fn test_mul_identity() {
        let a = from_quat(Quat::from_axis_angle(Vec3::X, 0.5));
        assert!(approx_eq(&mul(IDENTITY, a), &a, EPSILON));
        assert!(approx_eq(&mul(a, IDENTITY), &a, EPSILON));
    }

    #[test]
    fn test_mul_applies_right_first() {
        let translate = from_rotation_translation_scale(Quat::IDENTITY, Vec3::new(10.0, 0.0, 0.0), Vec3::ONE);
        let rotate = from_quat(Quat::from_axis_angle(Vec3::Z, FRAC_PI_2));

        // rotate X to Y, then translate
        let m = mul(translate, rotate);
        let p = transform_point(&m, Vec3::X);
        assert!(vec_approx_eq(p, Vec3::new(10.0, 1.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_trs_order() {
        // X * 2 = (2, 0, 0), rotated 90 about Z = (0, 2, 0), + (10, 0, 0) = (10, 2, 0)
        let q = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let m = from_rotation_translation_scale(q, Vec3::new(10.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let p = transform_point(&m, Vec3::X);
        assert!(vec_approx_eq(p, Vec3::new(10.0, 2.0, 0.0)), "got {:?}", p);
        assert!(vec_approx_eq(get_translation(&m), Vec3::new(10.0, 0.0, 0.0)));
        assert!(vec_approx_eq(get_scaling(&m), Vec3::new(2.0, 1.0, 1.0)));
    }

    #[test]
    fn test_look_at_down_negative_z_is_identity() {
        let m = look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), Vec3::Y);
        assert!(approx_eq(&m, &IDENTITY, EPSILON));
    }

    #[test]
    fn test_look_at_forward_points_to_target() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(-4.0, 0.0, 1.0);
        let m = look_at(eye, target, Vec3::Y);
        let forward = transform_point(&m, -Vec3::Z);
        let expected = (target - eye).normalized();
        assert!(vec_approx_eq(forward, expected), "got {:?}", forward);
    }

    #[test]
    fn test_look_at_degenerate_inputs_stay_orthonormal() {
        let same = look_at(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(vec_approx_eq(get_scaling(&same), Vec3::ONE));

        let straight_up = look_at(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert!(vec_approx_eq(get_scaling(&straight_up), Vec3::ONE));
    }

    #[test]
    fn test_transpose_twice() {
        let m = from_rotation_translation_scale(
            Quat::from_axis_angle(Vec3::Y, 0.3),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::ONE,
        );
        assert!(approx_eq(&transpose(transpose(m)), &m, 0.0));
    }
}
