// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::{Mat3, Mat4, Vec3, EPSILON};

/// Quaternion stored as `(x, y, z, w)`; `w` is the scalar part.
///
/// * All angles are expressed in radians.
/// * Rigid-body state vectors lay quaternions out as `(w, x, y, z)`; use
///   [`Quat::from_wxyz`] and the component accessors at that boundary.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    data: [f64; 4],
}

impl Quat {
    /// Creates a quaternion from components in `(x, y, z, w)` order.
    ///
    /// Callers should provide finite components; use
    /// [`Quat::from_axis_angle`] for axis/angle construction.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// Creates a quaternion from components in scalar-first `(w, x, y, z)` order.
    pub const fn from_wxyz(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, w)
    }

    /// Returns the identity quaternion.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Returns the quaternion as an `(x, y, z, w)` array.
    pub const fn to_array(self) -> [f64; 4] {
        self.data
    }

    /// Scalar part.
    pub const fn w(&self) -> f64 {
        self.data[3]
    }

    /// First vector component.
    pub const fn x(&self) -> f64 {
        self.data[0]
    }

    /// Second vector component.
    pub const fn y(&self) -> f64 {
        self.data[1]
    }

    /// Third vector component.
    pub const fn z(&self) -> f64 {
        self.data[2]
    }

    /// Vector part `(x, y, z)`.
    pub const fn vector(&self) -> Vec3 {
        Vec3::new(self.data[0], self.data[1], self.data[2])
    }

    /// Constructs a quaternion from a rotation axis and angle in radians.
    ///
    /// Returns the identity quaternion when the axis length is ≤ `EPSILON`.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let len_sq = axis.length_squared();
        if len_sq <= EPSILON * EPSILON {
            return Self::identity();
        }
        let norm_axis = axis.scale(1.0 / len_sq.sqrt());
        let (sin_half, cos_half) = (angle * 0.5).sin_cos();
        let scaled = norm_axis.scale(sin_half);
        Self::new(scaled.x(), scaled.y(), scaled.z(), cos_half)
    }

    /// Hamilton product of two quaternions (`self * other`).
    ///
    /// Operand order matters: quaternion multiplication is non‑commutative.
    /// Inputs need not be normalized.
    ///
    /// # Examples
    /// ```
    /// use core::f64::consts::FRAC_PI_2;
    /// use sauce_math::{Quat, Vec3};
    /// let yaw = Quat::from_axis_angle(Vec3::UNIT_Y, FRAC_PI_2);
    /// let pitch = Quat::from_axis_angle(Vec3::UNIT_X, FRAC_PI_2);
    /// assert_ne!(yaw.multiply(&pitch), pitch.multiply(&yaw));
    /// ```
    pub fn multiply(&self, other: &Self) -> Self {
        let [ax, ay, az, aw] = self.data;
        let [bx, by, bz, bw] = other.data;
        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// Multiplies every component by `scalar`.
    pub fn scale(&self, scalar: f64) -> Self {
        let [x, y, z, w] = self.data;
        Self::new(x * scalar, y * scalar, z * scalar, w * scalar)
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Self) -> Self {
        let [ax, ay, az, aw] = self.data;
        let [bx, by, bz, bw] = other.data;
        Self::new(ax + bx, ay + by, az + bz, aw + bw)
    }

    /// Euclidean norm `|q|`.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    /// Normalises the quaternion; returns identity when norm is ~0.
    pub fn normalize(&self) -> Self {
        let len = self.norm();
        if len <= EPSILON {
            return Self::identity();
        }
        self.scale(1.0 / len)
    }

    /// Converts the quaternion to a 3×3 rotation matrix without normalising.
    ///
    /// A non-unit quaternion yields a matrix that is not orthonormal, so
    /// accumulated drift in `|q|` stays observable to callers.
    pub fn to_mat3(&self) -> Mat3 {
        let [x, y, z, w] = self.data;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        Mat3::from_rows([
            [1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy)],
            [2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx)],
            [2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy)],
        ])
    }

    /// Converts the quaternion to a rotation matrix (column-major 4×4).
    ///
    /// The quaternion is normalised first so the result is always a proper
    /// rotation, which is what rendering consumers expect.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_mat3(&self.normalize().to_mat3())
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

/// Converts a 4‑element `(x, y, z, w)` array into a `Quat` verbatim.
impl From<[f64; 4]> for Quat {
    fn from(value: [f64; 4]) -> Self {
        Self { data: value }
    }
}
