// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! sauce-physics: rigid-body dynamics over a flat ODE state vector.
//!
//! A tick runs in three phases:
//! 1. pack every body's `x, q, P, L` into a stride-13 vector and integrate it
//!    with an [`OdeSolver`],
//! 2. unpack and refresh derived quantities (`v`, `Iinv`, `ω`),
//! 3. resolve colliding contacts with impulses, halving the solver's step
//!    size on each impulse.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! embedding application's job.

pub mod body;
pub mod collision;
pub mod config;
pub mod deriv;
pub mod error;
pub mod forces;
pub mod mass;
pub mod solver;
pub mod world;

pub use body::{array_to_state, ddt_state_to_array, state_to_array, RigidBody, STATE_SIZE};
pub use collision::{
    collision, colliding, find_all_collisions, point_velocity, relative_normal_velocity, Contact,
    ResolutionParams, ResolutionReport, THRESHOLD,
};
pub use config::SimConfig;
pub use deriv::RigidBodySystem;
pub use error::{PhysicsError, Result};
pub use forces::{compute_force_and_torque, ForceModel, Gravity, STANDARD_GRAVITY};
pub use mass::{
    compute_center_of_mass_and_volume, compute_inertia_tensor, compute_inverse_inertia_tensor,
    MassProperties,
};
pub use solver::{create_solver, DerivativeFn, EulerSolver, OdeSolver, SolverKind};
pub use world::{StepReport, World};
