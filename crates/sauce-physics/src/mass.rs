// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mass properties of closed triangle meshes.
//!
//! The mesh is decomposed into signed tetrahedra, one per triangle, with the
//! fourth vertex at a reference point (the origin for the centroid pass, the
//! centre of mass for the inertia pass). Signed volumes cancel outside the
//! surface, so any closed, consistently wound mesh works regardless of where
//! the reference point lies.
//!
//! The inertia tensor is normalised by volume, i.e. it is the tensor of a
//! uniformly dense body of unit mass. Scale by the body's mass to get `Ibody`.

use sauce_geom::mesh::{triangles, validate_mesh};
use sauce_math::{Mat3, Vec3};
use tracing::warn;

use crate::error::{PhysicsError, Result};

/// Smallest accepted `|6·volume|` before moments are considered degenerate.
pub const VOLUME_EPSILON: f64 = 1e-12;

/// Centre of mass, volume, and inertia of a uniformly dense closed mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Centre of mass in mesh coordinates.
    pub com: Vec3,
    /// Enclosed volume (always `>= 0`).
    pub volume: f64,
    /// Inertia tensor about `com` for unit mass; symmetric.
    pub inertia_tensor: Mat3,
    /// Inverse of `inertia_tensor`.
    pub inverse_inertia_tensor: Mat3,
}

impl MassProperties {
    /// Runs the full extraction pipeline on a mesh.
    pub fn from_mesh(vertices: &[Vec3], indices: &[u32]) -> Result<Self> {
        let (com, volume) = compute_center_of_mass_and_volume(vertices, indices)?;
        let inertia_tensor = compute_inertia_tensor(vertices, indices, com)?;
        let inverse_inertia_tensor = compute_inverse_inertia_tensor(&inertia_tensor)?;
        Ok(Self {
            com,
            volume,
            inertia_tensor,
            inverse_inertia_tensor,
        })
    }
}

fn det_columns(a: &Vec3, b: &Vec3, c: &Vec3) -> f64 {
    // det([a b c]) with the vectors as columns is the scalar triple product.
    a.dot(&b.cross(c))
}

/// Centre of mass and enclosed volume of a closed mesh.
///
/// If the signed volume sums to exactly zero the centroid accumulator is
/// returned unscaled rather than dividing by zero.
pub fn compute_center_of_mass_and_volume(
    vertices: &[Vec3],
    indices: &[u32],
) -> Result<(Vec3, f64)> {
    validate_mesh(vertices, indices)?;
    let mut centroid_accum = Vec3::ZERO;
    let mut volume_x6 = 0.0;
    for [v0, v1, v2] in triangles(vertices, indices) {
        let d = det_columns(&v0, &v1, &v2);
        centroid_accum += v0.add(&v1).add(&v2).scale(d);
        volume_x6 += d;
    }
    let com = if volume_x6 == 0.0 {
        centroid_accum
    } else {
        centroid_accum.scale(1.0 / (4.0 * volume_x6))
    };
    Ok((com, (volume_x6 / 6.0).abs()))
}

/// Inertia tensor about `com`, normalised to unit mass.
///
/// Fails with [`PhysicsError::DegenerateGeometry`] when the signed volume is
/// below [`VOLUME_EPSILON`].
pub fn compute_inertia_tensor(vertices: &[Vec3], indices: &[u32], com: Vec3) -> Result<Mat3> {
    validate_mesh(vertices, indices)?;
    let mut volume = 0.0;
    let mut diag = [0.0_f64; 3];
    let mut offd = [0.0_f64; 3];

    for tri in triangles(vertices, indices) {
        let [a, b, c] = tri.map(|v| v.sub(&com));
        let d = det_columns(&a, &b, &c);
        volume += d;
        for j in 0..3 {
            let j1 = (j + 1) % 3;
            let j2 = (j + 2) % 3;
            let (aj, bj, cj) = (a.component(j), b.component(j), c.component(j));
            let (a1, b1, c1) = (a.component(j1), b.component(j1), c.component(j1));
            let (a2, b2, c2) = (a.component(j2), b.component(j2), c.component(j2));
            diag[j] += d * (aj * aj + bj * bj + cj * cj + aj * bj + bj * cj + cj * aj);
            offd[j] += d
                * (a1 * b2 + b1 * c2 + c1 * a2 + a1 * c2 + b1 * a2 + c1 * b2
                    + 2.0 * (a1 * a2 + b1 * b2 + c1 * c2));
        }
    }

    if !volume.is_finite() || volume.abs() < VOLUME_EPSILON {
        warn!(volume, "rejecting degenerate mesh for inertia");
        return Err(PhysicsError::DegenerateGeometry { volume });
    }

    // ∫x² dV = Σ d·(…)/60 and V = Σ d/6, hence the 10 and 20 divisors.
    let diag = diag.map(|s| s / (volume * 10.0));
    let offd = offd.map(|s| s / (volume * 20.0));
    Ok(Mat3::from_rows([
        [diag[1] + diag[2], -offd[2], -offd[1]],
        [-offd[2], diag[0] + diag[2], -offd[0]],
        [-offd[1], -offd[0], diag[0] + diag[1]],
    ]))
}

/// Direct 3×3 inverse of an inertia tensor.
pub fn compute_inverse_inertia_tensor(inertia: &Mat3) -> Result<Mat3> {
    inertia
        .inverse()
        .ok_or_else(|| PhysicsError::SingularMatrix {
            determinant: inertia.determinant(),
        })
}
