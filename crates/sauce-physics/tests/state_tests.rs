// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! State-vector packing and the rigid-body derivative function.

mod common;

use common::{assert_close, assert_vec_close, ball};
use sauce_math::{Mat3, Quat, Vec3};
use sauce_physics::{
    array_to_state, compute_force_and_torque, ddt_state_to_array, state_to_array, EulerSolver,
    Gravity, OdeSolver, PhysicsError, RigidBody, RigidBodySystem, STANDARD_GRAVITY, STATE_SIZE,
};

fn spinning_body() -> RigidBody {
    RigidBody::new(3.0, Mat3::from_diagonal(Vec3::new(1.0, 2.0, 3.0)))
        .unwrap()
        .with_position(Vec3::new(1.0, -2.0, 0.5))
        .with_orientation(Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.7))
        .with_velocity(Vec3::new(0.25, 0.0, -4.0))
        .with_angular_momentum(Vec3::new(0.3, -1.2, 2.0))
}

#[test]
fn pack_then_unpack_restores_primary_state() {
    let body = spinning_body();
    let mut y = vec![f64::NAN; 2];
    state_to_array(&body, &mut y, 2);
    assert_eq!(y.len(), 2 + STATE_SIZE);

    let mut restored = ball(3.0, 1.0);
    restored.inertia_body = body.inertia_body;
    restored.inertia_body_inv = body.inertia_body_inv;
    array_to_state(&y, 2, &mut restored).unwrap();

    assert_eq!(restored.position, body.position);
    assert_eq!(restored.orientation, body.orientation);
    assert_eq!(restored.linear_momentum, body.linear_momentum);
    assert_eq!(restored.angular_momentum, body.angular_momentum);
    assert_vec_close(restored.velocity, body.velocity, 1e-15);
    assert_vec_close(restored.angular_velocity, body.angular_velocity, 1e-12);
}

#[test]
fn short_buffers_are_rejected_without_touching_the_body() {
    let body = spinning_body();
    let y = vec![1.0; STATE_SIZE + 1];
    let mut target = body;
    let err = array_to_state(&y, 2, &mut target).unwrap_err();
    assert!(matches!(err, PhysicsError::InvalidArgument(_)), "{err}");
    assert_eq!(target, body);
    assert!(array_to_state(&y, usize::MAX, &mut target).is_err());

    let mut xdot = vec![0.0; STATE_SIZE];
    assert!(ddt_state_to_array(&body, &mut xdot, 1).is_err());
    assert!(xdot.iter().all(|v| v.abs() < f64::EPSILON));
    ddt_state_to_array(&body, &mut xdot, 0).unwrap();
}

#[test]
fn quaternion_is_stored_scalar_first() {
    let body = ball(1.0, 1.0).with_orientation(Quat::new(0.1, 0.2, 0.3, 0.9));
    let mut y = Vec::new();
    state_to_array(&body, &mut y, 0);
    assert_eq!(&y[3..7], &[0.9, 0.1, 0.2, 0.3]);
}

#[test]
fn derived_quantities_follow_orientation() {
    let body = spinning_body();
    let r = body.orientation.to_mat3();
    let expected = r.multiply(&body.inertia_body_inv).multiply(&r.transpose());
    for row in 0..3 {
        for col in 0..3 {
            assert_close(
                body.inertia_inv_world.at(row, col),
                expected.at(row, col),
                1e-12,
            );
        }
    }
    assert_vec_close(body.velocity, Vec3::new(0.25, 0.0, -4.0), 1e-15);
    assert_vec_close(
        body.angular_velocity,
        body.inertia_inv_world.mul_vec(&body.angular_momentum),
        1e-15,
    );
}

#[test]
fn derivative_layout() {
    let mut body = ball(2.0, 1.0)
        .with_velocity(Vec3::new(1.0, 2.0, 3.0))
        .with_angular_momentum(Vec3::new(0.0, 0.0, 2.0));
    body.force = Vec3::new(4.0, 5.0, 6.0);
    body.torque = Vec3::new(-1.0, 0.0, 1.0);

    let mut xdot = vec![0.0; STATE_SIZE];
    ddt_state_to_array(&body, &mut xdot, 0).unwrap();
    assert_eq!(&xdot[0..3], &[1.0, 2.0, 3.0]);
    // q̇ = ½·(0, ω)⊗1 with ω = (0, 0, 2)
    assert_eq!(&xdot[3..7], &[0.0, 0.0, 0.0, 1.0]);
    assert_eq!(&xdot[7..10], &[4.0, 5.0, 6.0]);
    assert_eq!(&xdot[10..13], &[-1.0, 0.0, 1.0]);
}

#[test]
fn baseline_forces_are_gravity() {
    let mut body = ball(2.0, 1.0);
    body.torque = Vec3::new(9.0, 9.0, 9.0);
    compute_force_and_torque(0.0, &mut body);
    assert_vec_close(
        body.force,
        Vec3::new(0.0, -2.0 * STANDARD_GRAVITY, 0.0),
        1e-12,
    );
    assert_vec_close(body.torque, Vec3::ZERO, 0.0);
}

#[test]
fn system_derivative_treats_bodies_independently() {
    let mut system = RigidBodySystem::new(Box::new(Gravity { g: 10.0 }));
    system.push(ball(1.0, 1.0).with_velocity(Vec3::new(1.0, 0.0, 0.0)));
    system.push(ball(4.0, 2.0).with_velocity(Vec3::new(0.0, 0.0, -2.0)));

    let x = system.pack_state();
    assert_eq!(x.len(), 2 * STATE_SIZE);
    let mut xdot = vec![0.0; x.len()];
    system.dxdt(0.0, &x, &mut xdot).unwrap();

    assert_eq!(&xdot[0..3], &[1.0, 0.0, 0.0]);
    assert_eq!(&xdot[7..10], &[0.0, -10.0, 0.0]);
    assert_eq!(&xdot[STATE_SIZE..STATE_SIZE + 3], &[0.0, 0.0, -2.0]);
    assert_eq!(&xdot[STATE_SIZE + 7..STATE_SIZE + 10], &[0.0, -40.0, 0.0]);
}

#[test]
fn system_rejects_mismatched_lengths() {
    let mut system = RigidBodySystem::default();
    system.push(ball(1.0, 1.0));
    let mut xdot = vec![0.0; STATE_SIZE];
    assert!(system.dxdt(0.0, &[0.0; 5], &mut xdot).is_err());
    assert!(system.unpack_state(&[0.0; STATE_SIZE + 1]).is_err());
}

#[test]
fn custom_force_model_sees_body_index() {
    let mut system = RigidBodySystem::new(Box::new(|_t: f64, index: usize, body: &mut RigidBody| {
        if index == 1 {
            body.torque += Vec3::new(0.0, 1.0, 0.0);
        }
    }));
    system.push(ball(1.0, 1.0));
    system.push(ball(1.0, 1.0));
    let x = system.pack_state();
    let mut xdot = vec![0.0; x.len()];
    system.dxdt(0.0, &x, &mut xdot).unwrap();
    assert_eq!(&xdot[10..13], &[0.0, 0.0, 0.0]);
    assert_eq!(&xdot[STATE_SIZE + 10..STATE_SIZE + 13], &[0.0, 1.0, 0.0]);
}

#[test]
fn euler_orientation_drifts_off_unit_norm() {
    let mut system = RigidBodySystem::new(Box::new(Gravity { g: 0.0 }));
    system.push(
        ball(1.0, 1.0).with_angular_momentum(Vec3::new(0.0, 3.0, 0.0)),
    );
    let solver = EulerSolver::new(0.01).unwrap();

    let x0 = system.pack_state();
    let x1 = solver
        .step(&x0, 0.0, 1.0, &mut |t: f64, x: &[f64], xdot: &mut [f64]| {
            system.dxdt(t, x, xdot).unwrap();
        })
        .unwrap();
    system.unpack_state(&x1).unwrap();

    let q = system.bodies()[0].orientation;
    assert!(q.norm() > 1.0 + 1e-4, "norm {}", q.norm());
    assert_close(q.normalize().norm(), 1.0, 1e-12);
}
