// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::Mul;

use crate::{Vec3, EPSILON};

/// Row-major 3×3 matrix for inertia tensors and rotations.
///
/// `rows[r][c]` addresses row `r`, column `c`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    rows: [[f64; 3]; 3],
}

impl Mat3 {
    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Returns the zero matrix.
    pub const fn zero() -> Self {
        Self::from_rows([[0.0; 3]; 3])
    }

    /// Creates a matrix from row arrays.
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Diagonal matrix with `d` on the diagonal.
    pub const fn from_diagonal(d: Vec3) -> Self {
        Self::from_rows([[d.x(), 0.0, 0.0], [0.0, d.y(), 0.0], [0.0, 0.0, d.z()]])
    }

    /// Skew-symmetric cross-product matrix of `v`, so that `star(a) * b == a × b`.
    pub const fn star(v: Vec3) -> Self {
        let (x, y, z) = (v.x(), v.y(), v.z());
        Self::from_rows([[0.0, -z, y], [z, 0.0, -x], [-y, x, 0.0]])
    }

    /// Returns the rows as nested arrays.
    pub const fn to_rows(self) -> [[f64; 3]; 3] {
        self.rows
    }

    /// Entry at `(row, col)`.
    pub const fn at(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.rows[c][r];
            }
        }
        Self::from_rows(out)
    }

    /// Matrix product `self * rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.rows[r][k] * rhs.rows[k][c]).sum();
            }
        }
        Self::from_rows(out)
    }

    /// Matrix–vector product `self * v`.
    pub fn mul_vec(&self, v: &Vec3) -> Vec3 {
        let [x, y, z] = v.to_array();
        let row = |r: usize| self.rows[r][0] * x + self.rows[r][1] * y + self.rows[r][2] * z;
        Vec3::new(row(0), row(1), row(2))
    }

    /// Multiplies every entry by `scalar`.
    pub fn scale(&self, scalar: f64) -> Self {
        let mut out = self.rows;
        for value in out.iter_mut().flatten() {
            *value *= scalar;
        }
        Self::from_rows(out)
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Largest absolute entry; used to scale singularity tolerances.
    pub fn max_abs(&self) -> f64 {
        self.rows
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Direct inverse via the adjugate.
    ///
    /// Returns `None` when the matrix is numerically singular: the determinant
    /// is compared against `EPSILON` scaled by the cube of the largest entry, so
    /// the test does not depend on the units of the matrix.
    pub fn inverse(&self) -> Option<Self> {
        let scale = self.max_abs();
        let det = self.determinant();
        if !det.is_finite() || scale == 0.0 || det.abs() <= EPSILON * scale * scale * scale {
            return None;
        }
        let m = &self.rows;
        let inv_det = 1.0 / det;
        let adj = [
            [
                m[1][1] * m[2][2] - m[1][2] * m[2][1],
                m[0][2] * m[2][1] - m[0][1] * m[2][2],
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
            ],
            [
                m[1][2] * m[2][0] - m[1][0] * m[2][2],
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                m[0][2] * m[1][0] - m[0][0] * m[1][2],
            ],
            [
                m[1][0] * m[2][1] - m[1][1] * m[2][0],
                m[0][1] * m[2][0] - m[0][0] * m[2][1],
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
            ],
        ];
        Some(Self::from_rows(adj).scale(inv_det))
    }

    /// Returns `true` when `|a_rc - a_cr| <= tol` for every off-diagonal pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let rows = &self.rows;
        (0..3).all(|r| (0..r).all(|c| (rows[r][c] - rows[c][r]).abs() <= tol))
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[[f64; 3]; 3]> for Mat3 {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_rows(rows)
    }
}

impl Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.mul_vec(&rhs)
    }
}
