// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The derivative function handed to the integrator.

use sauce_math::Vec3;

use crate::body::{array_to_state, ddt_state_to_array, state_to_array, RigidBody, STATE_SIZE};
use crate::error::{PhysicsError, Result};
use crate::forces::{ForceModel, Gravity};

/// A set of rigid bodies and the forces acting on them.
///
/// Owns the per-body constants (`mass`, `Ibody⁻¹`) that the flat state vector
/// does not carry.
pub struct RigidBodySystem {
    bodies: Vec<RigidBody>,
    forces: Box<dyn ForceModel>,
}

impl std::fmt::Debug for RigidBodySystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigidBodySystem")
            .field("bodies", &self.bodies)
            .finish_non_exhaustive()
    }
}

impl Default for RigidBodySystem {
    fn default() -> Self {
        Self::new(Box::new(Gravity::default()))
    }
}

impl RigidBodySystem {
    /// Creates an empty system driven by `forces`.
    pub fn new(forces: Box<dyn ForceModel>) -> Self {
        Self {
            bodies: Vec::new(),
            forces,
        }
    }

    /// Appends a body and returns its index.
    pub fn push(&mut self, body: RigidBody) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Replaces the force model.
    pub fn set_forces(&mut self, forces: Box<dyn ForceModel>) {
        self.forces = forces;
    }

    /// Bodies in state-vector order.
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    /// Mutable access for contact resolution.
    pub fn bodies_mut(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True when the system holds no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Packs every body's primary state into a fresh vector.
    pub fn pack_state(&self) -> Vec<f64> {
        let mut y = Vec::with_capacity(self.bodies.len() * STATE_SIZE);
        for (i, body) in self.bodies.iter().enumerate() {
            state_to_array(body, &mut y, i * STATE_SIZE);
        }
        y
    }

    /// Reads a packed state vector back into the bodies.
    pub fn unpack_state(&mut self, y: &[f64]) -> Result<()> {
        self.check_len(y.len())?;
        for (i, body) in self.bodies.iter_mut().enumerate() {
            array_to_state(y, i * STATE_SIZE, body)?;
        }
        Ok(())
    }

    /// Writes `dx/dt` at time `t` for the packed state `x` into `xdot`.
    ///
    /// Bodies are evaluated independently on scratch copies; `self` is not
    /// modified.
    pub fn dxdt(&self, t: f64, x: &[f64], xdot: &mut [f64]) -> Result<()> {
        self.check_len(x.len())?;
        if xdot.len() != x.len() {
            return Err(PhysicsError::InvalidArgument(format!(
                "derivative buffer has {} entries, state has {}",
                xdot.len(),
                x.len()
            )));
        }
        for (i, template) in self.bodies.iter().enumerate() {
            let offset = i * STATE_SIZE;
            let mut body = *template;
            array_to_state(x, offset, &mut body)?;
            body.force = Vec3::ZERO;
            body.torque = Vec3::ZERO;
            self.forces.apply(t, i, &mut body);
            ddt_state_to_array(&body, xdot, offset)?;
        }
        Ok(())
    }

    fn check_len(&self, len: usize) -> Result<()> {
        let expected = self.bodies.len() * STATE_SIZE;
        if len == expected {
            Ok(())
        } else {
            Err(PhysicsError::InvalidArgument(format!(
                "state has {len} entries, expected {expected} for {} bodies",
                self.bodies.len()
            )))
        }
    }
}
