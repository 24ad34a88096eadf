// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! External force accumulation.

use sauce_math::Vec3;

use crate::body::RigidBody;

/// Standard gravitational acceleration in m/s².
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Source of external force and torque, evaluated once per body per
/// derivative evaluation.
///
/// The caller zeroes `body.force` and `body.torque` beforehand, so
/// implementations accumulate with `+=`.
pub trait ForceModel {
    /// Adds this model's contribution for body `index` at time `t`.
    fn apply(&self, t: f64, index: usize, body: &mut RigidBody);
}

impl<F> ForceModel for F
where
    F: Fn(f64, usize, &mut RigidBody),
{
    fn apply(&self, t: f64, index: usize, body: &mut RigidBody) {
        self(t, index, body);
    }
}

/// Uniform gravity of magnitude `g` along -Y; no torque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Acceleration magnitude.
    pub g: f64,
}

impl Default for Gravity {
    fn default() -> Self {
        Self {
            g: STANDARD_GRAVITY,
        }
    }
}

impl ForceModel for Gravity {
    fn apply(&self, _t: f64, _index: usize, body: &mut RigidBody) {
        body.force += Vec3::new(0.0, -self.g * body.mass, 0.0);
    }
}

/// Baseline force policy: resets the accumulators and applies standard gravity.
pub fn compute_force_and_torque(t: f64, body: &mut RigidBody) {
    body.force = Vec3::ZERO;
    body.torque = Vec3::ZERO;
    Gravity::default().apply(t, 0, body);
}
