//! Euler angles with an explicit rotation order
//!
//! The order names the axes in the sequence their rotation matrices are
//! multiplied, so `Xyz` means `R = Rx * Ry * Rz` (intrinsic X, then Y, then Z).
//! The six orders are not interchangeable: each has its own quaternion sign
//! pattern and its own matrix cells used during extraction.

use serde::{Deserialize, Deserializer, Serialize};

use crate::mat4::{self, Mat4};
use crate::{Quat, Vec3};

/// Magnitude of the asin'd matrix cell at which extraction treats the
/// rotation as gimbal locked.
pub const GIMBAL_LOCK_THRESHOLD: f32 = 0.9999999;

/// Rotation order of an [`Euler`] triple
///
/// Serialized as the uppercase axis sequence (`"XYZ"`, `"YXZ"`, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EulerOrder {
    #[default]
    Xyz,
    Yzx,
    Zxy,
    Xzy,
    Yxz,
    Zyx,
}

impl EulerOrder {
    pub const ALL: [EulerOrder; 6] = [
        EulerOrder::Xyz,
        EulerOrder::Yzx,
        EulerOrder::Zxy,
        EulerOrder::Xzy,
        EulerOrder::Yxz,
        EulerOrder::Zyx,
    ];

    /// Decode a stored order tag. Unknown tags fall back to `Xyz`.
    pub fn from_tag(tag: u8) -> Self {
        Self::ALL.get(tag as usize).copied().unwrap_or_default()
    }

    /// Parse an axis sequence such as `"yxz"`, ignoring case. Unknown
    /// names fall back to `Xyz`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "YZX" => EulerOrder::Yzx,
            "ZXY" => EulerOrder::Zxy,
            "XZY" => EulerOrder::Xzy,
            "YXZ" => EulerOrder::Yxz,
            "ZYX" => EulerOrder::Zyx,
            _ => EulerOrder::Xyz,
        }
    }

    /// Numeric tag stored alongside the angles
    pub fn tag(self) -> u8 {
        match self {
            EulerOrder::Xyz => 0,
            EulerOrder::Yzx => 1,
            EulerOrder::Zxy => 2,
            EulerOrder::Xzy => 3,
            EulerOrder::Yxz => 4,
            EulerOrder::Zyx => 5,
        }
    }
}

impl<'de> Deserialize<'de> for EulerOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Euler angles in radians plus the order they are applied in
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub order: EulerOrder,
}

impl Euler {
    pub const fn new(x: f32, y: f32, z: f32, order: EulerOrder) -> Self {
        Self { x, y, z, order }
    }

    /// Angles as a vector, dropping the order
    pub fn angles(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Closed-form quaternion for these angles in this order
    pub fn to_quaternion(&self) -> Quat {
        let (s1, c1) = (self.x * 0.5).sin_cos();
        let (s2, c2) = (self.y * 0.5).sin_cos();
        let (s3, c3) = (self.z * 0.5).sin_cos();

        match self.order {
            EulerOrder::Xyz => Quat::new(
                s1 * c2 * c3 + c1 * s2 * s3,
                c1 * s2 * c3 - s1 * c2 * s3,
                c1 * c2 * s3 + s1 * s2 * c3,
                c1 * c2 * c3 - s1 * s2 * s3,
            ),
            EulerOrder::Yxz => Quat::new(
                s1 * c2 * c3 + c1 * s2 * s3,
                c1 * s2 * c3 - s1 * c2 * s3,
                c1 * c2 * s3 - s1 * s2 * c3,
                c1 * c2 * c3 + s1 * s2 * s3,
            ),
            EulerOrder::Zxy => Quat::new(
                s1 * c2 * c3 - c1 * s2 * s3,
                c1 * s2 * c3 + s1 * c2 * s3,
                c1 * c2 * s3 + s1 * s2 * c3,
                c1 * c2 * c3 - s1 * s2 * s3,
            ),
            EulerOrder::Zyx => Quat::new(
                s1 * c2 * c3 - c1 * s2 * s3,
                c1 * s2 * c3 + s1 * c2 * s3,
                c1 * c2 * s3 - s1 * s2 * c3,
                c1 * c2 * c3 + s1 * s2 * s3,
            ),
            EulerOrder::Yzx => Quat::new(
                s1 * c2 * c3 + c1 * s2 * s3,
                c1 * s2 * c3 + s1 * c2 * s3,
                c1 * c2 * s3 - s1 * s2 * c3,
                c1 * c2 * c3 - s1 * s2 * s3,
            ),
            EulerOrder::Xzy => Quat::new(
                s1 * c2 * c3 - c1 * s2 * s3,
                c1 * s2 * c3 - s1 * c2 * s3,
                c1 * c2 * s3 + s1 * s2 * c3,
                c1 * c2 * c3 + s1 * s2 * s3,
            ),
        }
    }

    /// Overwrite the angles from the upper 3x3 of `m`, keeping the current order.
    ///
    /// `m` must be a pure rotation (unscaled). Near the poles one degree of
    /// freedom is unrecoverable; that angle is set to zero and the other one
    /// absorbs the whole rotation about the collapsed axis.
    pub fn set_from_rotation_matrix(&mut self, m: &Mat4) {
        // mRC: row R, column C
        let m11 = m[0][0];
        let m12 = m[1][0];
        let m13 = m[2][0];
        let m21 = m[0][1];
        let m22 = m[1][1];
        let m23 = m[2][1];
        let m31 = m[0][2];
        let m32 = m[1][2];
        let m33 = m[2][2];

        match self.order {
            EulerOrder::Xyz => {
                self.y = m13.clamp(-1.0, 1.0).asin();
                if m13.abs() < GIMBAL_LOCK_THRESHOLD {
                    self.x = (-m23).atan2(m33);
                    self.z = (-m12).atan2(m11);
                } else {
                    self.x = m32.atan2(m22);
                    self.z = 0.0;
                }
            }
            EulerOrder::Yxz => {
                self.x = (-m23.clamp(-1.0, 1.0)).asin();
                if m23.abs() < GIMBAL_LOCK_THRESHOLD {
                    self.y = m13.atan2(m33);
                    self.z = m21.atan2(m22);
                } else {
                    self.y = (-m31).atan2(m11);
                    self.z = 0.0;
                }
            }
            EulerOrder::Zxy => {
                self.x = m32.clamp(-1.0, 1.0).asin();
                if m32.abs() < GIMBAL_LOCK_THRESHOLD {
                    self.y = (-m31).atan2(m33);
                    self.z = (-m12).atan2(m22);
                } else {
                    self.y = 0.0;
                    self.z = m21.atan2(m11);
                }
            }
            EulerOrder::Zyx => {
                self.y = (-m31.clamp(-1.0, 1.0)).asin();
                if m31.abs() < GIMBAL_LOCK_THRESHOLD {
                    self.x = m32.atan2(m33);
                    self.z = m21.atan2(m11);
                } else {
                    self.x = 0.0;
                    self.z = (-m12).atan2(m22);
                }
            }
            EulerOrder::Yzx => {
                self.z = m21.clamp(-1.0, 1.0).asin();
                if m21.abs() < GIMBAL_LOCK_THRESHOLD {
                    self.x = (-m23).atan2(m22);
                    self.y = (-m31).atan2(m11);
                } else {
                    self.x = 0.0;
                    self.y = m13.atan2(m33);
                }
            }
            EulerOrder::Xzy => {
                self.z = (-m12.clamp(-1.0, 1.0)).asin();
                if m12.abs() < GIMBAL_LOCK_THRESHOLD {
                    self.x = m32.atan2(m22);
                    self.y = m13.atan2(m11);
                } else {
                    self.x = (-m23).atan2(m33);
                    self.y = 0.0;
                }
            }
        }
    }

    /// Overwrite the angles from a unit quaternion, keeping the current order
    pub fn set_from_quaternion(&mut self, q: Quat) {
        self.set_from_rotation_matrix(&mat4::from_quat(q));
    }

    /// Extract angles in the given order from a pure rotation matrix
    pub fn from_rotation_matrix(m: &Mat4, order: EulerOrder) -> Self {
        let mut euler = Self::new(0.0, 0.0, 0.0, order);
        euler.set_from_rotation_matrix(m);
        euler
    }

    /// Extract angles in the given order from a unit quaternion
    pub fn from_quaternion(q: Quat, order: EulerOrder) -> Self {
        let mut euler = Self::new(0.0, 0.0, 0.0, order);
        euler.set_from_quaternion(q);
        euler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    fn axis_product(euler: &Euler) -> Quat {
        let rx = Quat::from_axis_angle(Vec3::X, euler.x);
        let ry = Quat::from_axis_angle(Vec3::Y, euler.y);
        let rz = Quat::from_axis_angle(Vec3::Z, euler.z);
        match euler.order {
            EulerOrder::Xyz => rx * ry * rz,
            EulerOrder::Yxz => ry * rx * rz,
            EulerOrder::Zxy => rz * rx * ry,
            EulerOrder::Zyx => rz * ry * rx,
            EulerOrder::Yzx => ry * rz * rx,
            EulerOrder::Xzy => rx * rz * ry,
        }
    }

    const SAMPLES: [(f32, f32, f32); 4] = [
        (0.3, -0.5, 0.7),
        (1.2, 0.4, -1.0),
        (-1.4, 1.3, 0.05),
        (0.0, 0.0, 0.0),
    ];

    #[test]
    fn test_order_tags() {
        for order in EulerOrder::ALL {
            assert_eq!(EulerOrder::from_tag(order.tag()), order);
        }
        assert_eq!(EulerOrder::from_tag(6), EulerOrder::Xyz);
        assert_eq!(EulerOrder::from_tag(255), EulerOrder::Xyz);
    }

    #[test]
    fn test_order_names_deserialize() {
        use serde::de::value::{Error, StrDeserializer};
        use serde::de::IntoDeserializer;
        use serde::Deserialize;

        let parse = |name: &str| {
            let de: StrDeserializer<'_, Error> = name.into_deserializer();
            EulerOrder::deserialize(de).unwrap()
        };

        let names = ["XYZ", "YZX", "ZXY", "XZY", "YXZ", "ZYX"];
        for (name, order) in names.iter().zip(EulerOrder::ALL) {
            assert_eq!(parse(name), order);
        }
        assert_eq!(parse("zyx"), EulerOrder::Zyx);
        // unrecognised names load as the default order instead of failing
        assert_eq!(parse("QRS"), EulerOrder::Xyz);
        assert_eq!(parse(""), EulerOrder::Xyz);
    }

    #[test]
    fn test_quaternion_matches_axis_product() {
        for order in EulerOrder::ALL {
            for (x, y, z) in SAMPLES {
                let euler = Euler::new(x, y, z, order);
                let q = euler.to_quaternion();
                let expected = axis_product(&euler);
                assert!(
                    q.approx_same_rotation(expected, EPSILON),
                    "{:?} {:?}: {:?} vs {:?}", order, (x, y, z), q, expected
                );
            }
        }
    }

    #[test]
    fn test_orders_are_not_interchangeable() {
        let xyz = Euler::new(0.3, -0.5, 0.7, EulerOrder::Xyz).to_quaternion();
        let zyx = Euler::new(0.3, -0.5, 0.7, EulerOrder::Zyx).to_quaternion();
        assert!(!xyz.approx_same_rotation(zyx, EPSILON));
    }

    #[test]
    fn test_round_trip_inside_threshold() {
        for order in EulerOrder::ALL {
            for (x, y, z) in SAMPLES {
                let euler = Euler::new(x, y, z, order);
                let back = Euler::from_quaternion(euler.to_quaternion(), order);
                assert!(
                    (back.x - x).abs() < 0.001 && (back.y - y).abs() < 0.001 && (back.z - z).abs() < 0.001,
                    "{:?}: {:?} came back as {:?}", order, (x, y, z), back
                );
                assert_eq!(back.order, order);
            }
        }
    }

    #[test]
    fn test_gimbal_lock_collapses_one_angle() {
        // Exact 90 degree turn about Y: m13 == 1, so XYZ extraction is on the pole
        let m: Mat4 = [
            [0.0, 0.0, -1.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let euler = Euler::from_rotation_matrix(&m, EulerOrder::Xyz);

        assert_eq!(euler.z, 0.0);
        assert_eq!(euler.x, 0.0);
        assert!((euler.y - FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_gimbal_lock_every_order_keeps_rotation() {
        for order in EulerOrder::ALL {
            // put the asin'd angle on the pole for each order
            let (x, y, z) = match order {
                EulerOrder::Xyz | EulerOrder::Zyx => (0.4, FRAC_PI_2, 0.3),
                EulerOrder::Yxz | EulerOrder::Zxy => (FRAC_PI_2, 0.4, 0.3),
                EulerOrder::Yzx | EulerOrder::Xzy => (0.4, 0.3, FRAC_PI_2),
            };
            let q = Euler::new(x, y, z, order).to_quaternion();
            let back = Euler::from_quaternion(q, order);
            assert!(
                back.to_quaternion().approx_same_rotation(q, 0.001),
                "{:?} lost the rotation at the pole: {:?}", order, back
            );
        }
    }

    #[test]
    fn test_extraction_ignores_order_of_caller_fields() {
        let mut euler = Euler::new(9.0, 9.0, 9.0, EulerOrder::Zxy);
        euler.set_from_rotation_matrix(&mat4::IDENTITY);
        assert_eq!(euler, Euler::new(0.0, 0.0, 0.0, EulerOrder::Zxy));
    }
}
