// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::{Mat3, Quat, Vec3};

/// Column‑major 4×4 matrix used for model (world) transforms.
///
/// - Stored in column‑major order to align with GPU uploads by the renderer.
/// - Represents affine transforms; helper methods treat points with `w = 1`
///   and directions with `w = 0`.
///
/// # Examples
/// ```
/// use sauce_math::{Mat4, Vec3};
/// let t = Mat4::translation(5.0, -3.0, 2.0);
/// let p = Vec3::new(2.0, 4.0, -1.0);
/// assert_eq!(t.transform_point(&p).to_array(), [7.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    data: [f64; 16],
}

impl Mat4 {
    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, 0.0, // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Builds a translation matrix; translation occupies the last column.
    pub const fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, 0.0, // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                tx, ty, tz, 1.0, // col 3 (translation)
            ],
        }
    }

    /// Builds a non-uniform scale matrix.
    pub const fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            data: [
                sx, 0.0, 0.0, 0.0, // col 0
                0.0, sy, 0.0, 0.0, // col 1
                0.0, 0.0, sz, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Embeds a 3×3 linear map in the upper-left block.
    pub fn from_mat3(m: &Mat3) -> Self {
        let mut data = Self::identity().data;
        for col in 0..3 {
            for row in 0..3 {
                data[col * 4 + row] = m.at(row, col);
            }
        }
        Self { data }
    }

    /// Constructs a rotation matrix from a quaternion (normalised first).
    pub fn from_quat(q: &Quat) -> Self {
        q.to_mat4()
    }

    /// Rigid transform `T * R` placing a body at `position` with `orientation`.
    pub fn from_rotation_translation(orientation: &Quat, position: &Vec3) -> Self {
        Self::translation(position.x(), position.y(), position.z())
            .multiply(&Self::from_quat(orientation))
    }

    /// Creates a matrix from column-major array data.
    pub const fn new(data: [f64; 16]) -> Self {
        Self { data }
    }

    /// Returns the matrix as a column‑major array.
    pub const fn to_array(self) -> [f64; 16] {
        self.data
    }

    /// Entry at `(row, col)`.
    pub const fn at(&self, row: usize, col: usize) -> f64 {
        self.data[col * 4 + row]
    }

    /// Multiplies the matrix with another matrix (`self * rhs`).
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| self.at(row, k) * rhs.at(k, col)).sum();
            }
        }
        Self::new(out)
    }

    /// Transforms a point (assumes `w = 1`, no perspective divide).
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        let [x, y, z] = point.to_array();
        let row = |r: usize| {
            self.at(r, 0) * x + self.at(r, 1) * y + self.at(r, 2) * z + self.at(r, 3)
        };
        Vec3::new(row(0), row(1), row(2))
    }

    /// Transforms a direction vector (ignores translation, `w = 0`).
    pub fn transform_direction(&self, direction: &Vec3) -> Vec3 {
        let [x, y, z] = direction.to_array();
        let row = |r: usize| self.at(r, 0) * x + self.at(r, 1) * y + self.at(r, 2) * z;
        Vec3::new(row(0), row(1), row(2))
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 16]> for Mat4 {
    fn from(value: [f64; 16]) -> Self {
        Self { data: value }
    }
}

impl core::ops::Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}
