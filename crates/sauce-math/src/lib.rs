// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Double-precision math helpers for the Sauce rigid-body kernel: vectors,
//! quaternions, and 3×3 / 4×4 matrices.
//!
//! Everything here is `f64` so that integrated quantities (position,
//! orientation, momenta) keep the precision the ODE solver expects. Types are
//! plain `Copy` values with no hidden state; identical inputs always produce
//! identical outputs.

mod mat3;
mod mat4;
mod quat;
mod vec3;

pub use mat3::Mat3;
pub use mat4::Mat4;
pub use quat::Quat;
pub use vec3::Vec3;

/// Global epsilon used by math routines when detecting degenerate values.
pub const EPSILON: f64 = 1e-12;

/// Returns `true` when `a` and `b` differ by at most `tol` in absolute terms.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
