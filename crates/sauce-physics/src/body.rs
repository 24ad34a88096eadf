// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rigid-body record and its flattened state-vector representation.
//!
//! Primary (integrated) quantities are position, orientation, linear momentum
//! and angular momentum. Velocity, world-frame inverse inertia and angular
//! velocity are derived from them after every state read.

use sauce_geom::Transform;
use sauce_math::{Mat3, Mat4, Quat, Vec3};

use crate::error::{PhysicsError, Result};
use crate::mass::MassProperties;

/// Scalars per body in the state vector:
/// `[x.x, x.y, x.z, q.w, q.x, q.y, q.z, P.x, P.y, P.z, L.x, L.y, L.z]`.
pub const STATE_SIZE: usize = 13;

/// Rigid-body state record.
///
/// `mass` and the body-frame inertia tensors are constants supplied when the
/// body is created; they are not part of the integrated vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    /// Body-frame inertia tensor (`Ibody`).
    pub inertia_body: Mat3,
    /// Inverse of the body-frame inertia tensor (`Ibody⁻¹`).
    pub inertia_body_inv: Mat3,
    /// Mass, always `> 0`.
    pub mass: f64,
    /// Centre-of-mass position `x`.
    pub position: Vec3,
    /// Linear velocity `v = P / mass` (derived).
    pub velocity: Vec3,
    /// Orientation `q`. Not renormalised automatically.
    pub orientation: Quat,
    /// Angular velocity `ω = Iinv · L` (derived).
    pub angular_velocity: Vec3,
    /// Linear momentum `P`.
    pub linear_momentum: Vec3,
    /// Angular momentum `L`.
    pub angular_momentum: Vec3,
    /// World-frame inverse inertia `R · Ibody⁻¹ · Rᵀ` (derived).
    pub inertia_inv_world: Mat3,
    /// Accumulated external force (transient).
    pub force: Vec3,
    /// Accumulated external torque (transient).
    pub torque: Vec3,
}

impl RigidBody {
    /// Creates a body at rest at the origin with the given mass and body-frame inertia.
    pub fn new(mass: f64, inertia_body: Mat3) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "mass must be positive, got {mass}"
            )));
        }
        let inertia_body_inv = inertia_body
            .inverse()
            .ok_or_else(|| PhysicsError::SingularMatrix {
                determinant: inertia_body.determinant(),
            })?;
        let mut body = Self {
            inertia_body,
            inertia_body_inv,
            mass,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            orientation: Quat::identity(),
            angular_velocity: Vec3::ZERO,
            linear_momentum: Vec3::ZERO,
            angular_momentum: Vec3::ZERO,
            inertia_inv_world: Mat3::identity(),
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        };
        body.update_derived();
        Ok(body)
    }

    /// Creates a body from unit-mass mesh properties scaled to `mass`.
    pub fn from_mass_properties(props: &MassProperties, mass: f64) -> Result<Self> {
        Self::new(mass, props.inertia_tensor.scale(mass))
    }

    /// Moves the centre of mass to `position`.
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the orientation and refreshes derived quantities.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self.update_derived();
        self
    }

    /// Sets the linear momentum so that the body moves at `velocity`.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_momentum = velocity.scale(self.mass);
        self.update_derived();
        self
    }

    /// Sets the angular momentum and refreshes derived quantities.
    #[must_use]
    pub fn with_angular_momentum(mut self, angular_momentum: Vec3) -> Self {
        self.angular_momentum = angular_momentum;
        self.update_derived();
        self
    }

    /// Recomputes `v`, `Iinv` and `ω` from the primary quantities.
    pub fn update_derived(&mut self) {
        let r = self.orientation.to_mat3();
        self.velocity = self.linear_momentum.scale(1.0 / self.mass);
        self.inertia_inv_world = r.multiply(&self.inertia_body_inv).multiply(&r.transpose());
        self.angular_velocity = self.inertia_inv_world.mul_vec(&self.angular_momentum);
    }

    /// Recomputes only `v` and `ω`, keeping the current `Iinv`.
    ///
    /// Used after impulses, which change momenta but not orientation.
    pub fn update_velocities(&mut self) {
        self.velocity = self.linear_momentum.scale(1.0 / self.mass);
        self.angular_velocity = self.inertia_inv_world.mul_vec(&self.angular_momentum);
    }

    /// Velocity of the world-space point `p` rigidly attached to this body.
    pub fn point_velocity(&self, p: &Vec3) -> Vec3 {
        self.velocity.add(&self.angular_velocity.cross(&p.sub(&self.position)))
    }

    /// Kinetic energy `½·v·P + ½·ω·L`.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.velocity.dot(&self.linear_momentum)
            + 0.5 * self.angular_velocity.dot(&self.angular_momentum)
    }

    /// Placement of the body's centre of mass as a rigid transform.
    pub fn transform(&self) -> Transform {
        Transform::rigid(self.position, self.orientation)
    }

    /// World (model) matrix for the centre-of-mass frame.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform().to_mat4()
    }
}

/// Reads `x, q, P, L` from `y[offset..offset + STATE_SIZE]` into `body` and
/// refreshes the derived quantities.
///
/// `body.mass` and `body.inertia_body_inv` must already be set. Fails with
/// [`PhysicsError::InvalidArgument`] if `y` has no full block at `offset`;
/// `body` is left untouched in that case.
pub fn array_to_state(y: &[f64], offset: usize, body: &mut RigidBody) -> Result<()> {
    let Some(range) = state_block(y.len(), offset) else {
        return Err(short_buffer("state", y.len(), offset));
    };
    let s = &y[range];
    body.position = Vec3::new(s[0], s[1], s[2]);
    body.orientation = Quat::from_wxyz(s[3], s[4], s[5], s[6]);
    body.linear_momentum = Vec3::new(s[7], s[8], s[9]);
    body.angular_momentum = Vec3::new(s[10], s[11], s[12]);
    body.update_derived();
    Ok(())
}

/// Writes `x, q, P, L` of `body` into `y` at `offset`, growing `y` if needed.
pub fn state_to_array(body: &RigidBody, y: &mut Vec<f64>, offset: usize) {
    if y.len() < offset + STATE_SIZE {
        y.resize(offset + STATE_SIZE, 0.0);
    }
    let q = &body.orientation;
    let packed = [
        body.position.x(),
        body.position.y(),
        body.position.z(),
        q.w(),
        q.x(),
        q.y(),
        q.z(),
        body.linear_momentum.x(),
        body.linear_momentum.y(),
        body.linear_momentum.z(),
        body.angular_momentum.x(),
        body.angular_momentum.y(),
        body.angular_momentum.z(),
    ];
    y[offset..offset + STATE_SIZE].copy_from_slice(&packed);
}

/// Writes the time derivative of `body`'s state into `xdot` at `offset`:
/// `ẋ = v`, `q̇ = ½·(0, ω)⊗q`, `Ṗ = force`, `L̇ = torque`.
///
/// Fails with [`PhysicsError::InvalidArgument`] if `xdot` has no full block
/// at `offset`.
pub fn ddt_state_to_array(body: &RigidBody, xdot: &mut [f64], offset: usize) -> Result<()> {
    let Some(range) = state_block(xdot.len(), offset) else {
        return Err(short_buffer("derivative", xdot.len(), offset));
    };
    let omega = Quat::from_wxyz(
        0.0,
        body.angular_velocity.x(),
        body.angular_velocity.y(),
        body.angular_velocity.z(),
    );
    let qdot = omega.multiply(&body.orientation).scale(0.5);
    let packed = [
        body.velocity.x(),
        body.velocity.y(),
        body.velocity.z(),
        qdot.w(),
        qdot.x(),
        qdot.y(),
        qdot.z(),
        body.force.x(),
        body.force.y(),
        body.force.z(),
        body.torque.x(),
        body.torque.y(),
        body.torque.z(),
    ];
    xdot[range].copy_from_slice(&packed);
    Ok(())
}

fn state_block(len: usize, offset: usize) -> Option<core::ops::Range<usize>> {
    let end = offset.checked_add(STATE_SIZE)?;
    (end <= len).then_some(offset..end)
}

fn short_buffer(what: &str, len: usize, offset: usize) -> PhysicsError {
    PhysicsError::InvalidArgument(format!(
        "{what} buffer of {len} entries has no {STATE_SIZE}-entry block at offset {offset}"
    ))
}
