// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! End-to-end ticks: integrate, cull, resolve, and hand back model matrices.

mod common;

use core::f64::consts::FRAC_PI_2;
use std::cell::Cell;
use std::rc::Rc;

use common::{assert_close, assert_vec_close, ball, init_tracing, unit_cube};
use sauce_geom::Aabb;
use sauce_math::{Quat, Vec3};
use sauce_physics::{
    Contact, OdeSolver, PhysicsError, RigidBody, SimConfig, World, STANDARD_GRAVITY,
};

fn weightless() -> SimConfig {
    SimConfig {
        gravity: 0.0,
        ..SimConfig::default()
    }
}

/// Two unit cubes of mass 2 closing head-on along X, `gap` apart face to face.
fn closing_cubes(config: SimConfig, gap: f64) -> (World, Contact) {
    let (vertices, indices) = unit_cube();
    let mut world = World::new(config).unwrap();
    let a = world
        .add_mesh_body(&vertices, &indices, 2.0, Vec3::ZERO, Quat::identity())
        .unwrap();
    let b = world
        .add_mesh_body(
            &vertices,
            &indices,
            2.0,
            Vec3::new(1.0 + gap, 0.0, 0.0),
            Quat::identity(),
        )
        .unwrap();
    world.bodies_mut()[a] = world.bodies()[a].with_velocity(Vec3::new(1.0, 0.0, 0.0));
    world.bodies_mut()[b] = world.bodies()[b].with_velocity(Vec3::new(-1.0, 0.0, 0.0));
    let point = Vec3::new(0.5 + gap / 2.0, 0.0, 0.0);
    let contact = Contact::vertex_face(a, b, point, Vec3::new(-1.0, 0.0, 0.0));
    (world, contact)
}

#[test]
fn free_fall_under_gravity() {
    init_tracing();
    let mut world = World::new(SimConfig::default()).unwrap();
    let id = world.add_body(ball(2.0, 1.0), Aabb::EMPTY);
    let report = world.step(0.1, &[]).unwrap();

    assert_close(report.time, 0.1, 1e-15);
    assert_close(world.time(), 0.1, 1e-15);
    let body = &world.bodies()[id];
    assert_vec_close(
        body.velocity,
        Vec3::new(0.0, -STANDARD_GRAVITY * 0.1, 0.0),
        1e-9,
    );
    // Explicit Euler lags the exact -g·t²/2 by one step's worth of velocity.
    assert_close(
        body.position.y(),
        -STANDARD_GRAVITY * 0.01 * 0.01 * 45.0,
        1e-9,
    );
    assert!(report.resolution.converged);
}

#[test]
fn empty_world_only_advances_time() {
    let mut world = World::new(SimConfig::default()).unwrap();
    let report = world.step(0.25, &[]).unwrap();
    assert_close(report.time, 0.25, 0.0);
    assert_eq!(report.resolution.impulses, 0);
}

#[test]
fn non_positive_tick_is_rejected() {
    let mut world = World::new(SimConfig::default()).unwrap();
    assert!(matches!(
        world.step(0.0, &[]),
        Err(PhysicsError::InvalidArgument(_))
    ));
    assert!(matches!(
        world.step(-1.0, &[]),
        Err(PhysicsError::InvalidArgument(_))
    ));
    assert_close(world.time(), 0.0, 0.0);
}

#[test]
fn mesh_model_matrix_places_centroid_at_body_position() {
    let (vertices, indices) = unit_cube();
    let mut world = World::new(SimConfig::default()).unwrap();
    let id = world
        .add_mesh_body(
            &vertices,
            &indices,
            1.0,
            Vec3::new(0.0, 5.0, 0.0),
            Quat::identity(),
        )
        .unwrap();
    let model = world.model_matrix(id).unwrap();
    let centroid = model.transform_point(&Vec3::new(0.5, 0.5, 0.5));
    assert_vec_close(centroid, Vec3::new(0.0, 5.0, 0.0), 1e-12);
    assert_vec_close(
        model.transform_point(&Vec3::ZERO),
        Vec3::new(-0.5, 4.5, -0.5),
        1e-12,
    );

    let turned = world
        .add_mesh_body(
            &vertices,
            &indices,
            1.0,
            Vec3::new(0.0, 5.0, 0.0),
            Quat::from_axis_angle(Vec3::UNIT_Z, FRAC_PI_2),
        )
        .unwrap();
    let model = world.model_matrix(turned).unwrap();
    let face_centre = model.transform_point(&Vec3::new(1.0, 0.5, 0.5));
    assert_vec_close(face_centre, Vec3::new(0.0, 5.5, 0.0), 1e-12);

    let bvh = world.bvh(id).unwrap();
    assert_eq!(bvh.query(&bvh.bounds()).len(), 12);
    let cube = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
    assert!(bvh.bounds().contains(&cube));
    assert!(world.model_matrix(99).is_none());
}

#[test]
fn degenerate_mesh_body_is_rejected() {
    let vertices = vec![Vec3::ZERO, Vec3::UNIT_X, Vec3::UNIT_Y];
    let mut world = World::new(SimConfig::default()).unwrap();
    let err = world
        .add_mesh_body(
            &vertices,
            &[0, 1, 2, 0, 2, 1],
            1.0,
            Vec3::ZERO,
            Quat::identity(),
        )
        .unwrap_err();
    assert!(matches!(err, PhysicsError::DegenerateGeometry { .. }));
    assert!(world.bodies().is_empty());
}

#[test]
fn touching_cubes_collide_and_shrink_the_step() {
    init_tracing();
    let (mut world, contact) = closing_cubes(weightless(), 0.0);
    let report = world.step(0.01, &[contact]).unwrap();

    assert_eq!(report.culled, 0);
    assert_eq!(report.resolution.impulses, 1);
    assert!(report.resolution.converged);
    assert_close(report.step_size, 0.005, 1e-15);

    let bodies = world.bodies();
    assert_vec_close(bodies[0].velocity, Vec3::new(-0.5, 0.0, 0.0), 1e-12);
    assert_vec_close(bodies[1].velocity, Vec3::new(0.5, 0.0, 0.0), 1e-12);
    assert_vec_close(
        bodies[0].linear_momentum.add(&bodies[1].linear_momentum),
        Vec3::ZERO,
        1e-12,
    );

    // Nothing collides on the next tick, so the configured step comes back.
    let next = world.step(0.01, &[]).unwrap();
    assert_close(next.step_size, 0.01, 0.0);
}

#[test]
fn halved_step_governs_the_next_integration() {
    let (mut world, contact) = closing_cubes(weightless(), 0.0);
    let evaluations = Rc::new(Cell::new(0_usize));
    let counter = Rc::clone(&evaluations);
    world.set_force_model(Box::new(move |_t: f64, index: usize, _body: &mut RigidBody| {
        if index == 0 {
            counter.set(counter.get() + 1);
        }
    }));

    let first = world.step(0.01, &[contact]).unwrap();
    assert_eq!(first.resolution.impulses, 1);
    assert_close(first.step_size, 0.005, 0.0);
    assert_eq!(evaluations.get(), 1);

    evaluations.set(0);
    let second = world.step(0.01, &[]).unwrap();
    assert_eq!(evaluations.get(), 2);
    assert_close(second.step_size, 0.01, 0.0);

    evaluations.set(0);
    world.step(0.01, &[]).unwrap();
    assert_eq!(evaluations.get(), 1);
}

#[test]
fn step_stays_reduced_when_not_restored() {
    let config = SimConfig {
        restore_step_size: false,
        ..weightless()
    };
    let (mut world, contact) = closing_cubes(config, 0.0);
    world.step(0.01, &[contact]).unwrap();
    let next = world.step(0.01, &[]).unwrap();
    assert_close(next.step_size, 0.005, 0.0);
    assert_close(world.solver().step_size(), 0.005, 0.0);
}

#[test]
fn distant_bodies_are_culled() {
    let (mut world, contact) = closing_cubes(weightless(), 4.0);
    let report = world.step(0.01, &[contact]).unwrap();
    assert_eq!(report.culled, 1);
    assert_eq!(report.resolution.impulses, 0);
    assert_eq!(report.resolution.passes, 1);
    assert_vec_close(world.bodies()[0].velocity, Vec3::new(1.0, 0.0, 0.0), 1e-12);

    let bounds = world.world_bounds(1).unwrap();
    assert!(!bounds.overlaps(&world.world_bounds(0).unwrap()));
}

#[test]
fn unbounded_bodies_are_never_culled() {
    let mut world = World::new(weightless()).unwrap();
    let a = world.add_body(
        ball(1.0, 1.0).with_velocity(Vec3::new(1.0, 0.0, 0.0)),
        Aabb::EMPTY,
    );
    let b = world.add_body(
        ball(1.0, 1.0).with_position(Vec3::new(50.0, 0.0, 0.0)),
        Aabb::EMPTY,
    );
    let contact = Contact::vertex_face(a, b, Vec3::new(25.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
    let report = world.step(0.01, &[contact]).unwrap();
    assert_eq!(report.culled, 0);
    assert_eq!(report.resolution.impulses, 1);
}

#[test]
fn unknown_solver_fails_world_creation() {
    let config = SimConfig {
        solver: "verlet".to_owned(),
        ..SimConfig::default()
    };
    assert!(matches!(
        World::new(config),
        Err(PhysicsError::InvalidArgument(_))
    ));
}
