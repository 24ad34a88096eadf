// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use sauce_math::{Mat3, Vec3};
use sauce_physics::RigidBody;

/// Installs a test-writer fmt subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "expected {expected}, got {actual} (diff {diff}, tol {tol})"
    );
}

pub fn assert_vec_close(actual: Vec3, expected: Vec3, tol: f64) {
    for axis in 0..3 {
        assert_close(actual.component(axis), expected.component(axis), tol);
    }
}

pub fn assert_mat_close(actual: &Mat3, expected: &Mat3, tol: f64) {
    for r in 0..3 {
        for c in 0..3 {
            assert_close(actual.at(r, c), expected.at(r, c), tol);
        }
    }
}

/// Unit right tetrahedron at the origin, outward winding.
pub fn tetrahedron() -> (Vec<Vec3>, Vec<u32>) {
    let vertices = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    ];
    let indices = vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
    (vertices, indices)
}

/// Unit cube `[0,1]³`; vertex `4x + 2y + z` sits at `(x, y, z)`.
pub fn unit_cube() -> (Vec<Vec3>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(8);
    for x in 0..2_u8 {
        for y in 0..2_u8 {
            for z in 0..2_u8 {
                vertices.push(Vec3::new(f64::from(x), f64::from(y), f64::from(z)));
            }
        }
    }
    let indices = vec![
        0, 1, 3, 0, 3, 2, // x = 0
        4, 6, 7, 4, 7, 5, // x = 1
        0, 4, 5, 0, 5, 1, // y = 0
        2, 3, 7, 2, 7, 6, // y = 1
        0, 2, 6, 0, 6, 4, // z = 0
        1, 5, 7, 1, 7, 3, // z = 1
    ];
    (vertices, indices)
}

/// Body with isotropic inertia `k·I`.
pub fn ball(mass: f64, k: f64) -> RigidBody {
    RigidBody::new(mass, Mat3::from_diagonal(Vec3::new(k, k, k))).expect("valid body")
}
