// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-tick driver tying integration, culling, and contact resolution together.

use sauce_geom::{Aabb, AabbNode, AllPairs, BroadPhase};
use sauce_math::{Mat4, Quat, Vec3};
use tracing::{debug, info, instrument};

use crate::body::RigidBody;
use crate::collision::{find_all_collisions, Contact, ResolutionReport};
use crate::config::SimConfig;
use crate::deriv::RigidBodySystem;
use crate::error::{PhysicsError, Result};
use crate::forces::{ForceModel, Gravity};
use crate::mass::MassProperties;
use crate::solver::{create_solver, OdeSolver};

/// Geometry attached to a body, in mesh coordinates.
#[derive(Debug, Clone)]
struct BodyShape {
    /// Centre of mass in mesh coordinates.
    com: Vec3,
    /// Mesh-space bounds; empty when the body has no geometry.
    bounds: Aabb,
    bvh: Option<AabbNode>,
}

/// Summary of one [`World::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Simulation time after the tick.
    pub time: f64,
    /// Candidate contacts dropped because their bodies' bounds are disjoint.
    pub culled: usize,
    /// Contact resolution outcome.
    pub resolution: ResolutionReport,
    /// Solver step size after resolution; the next tick integrates with it.
    pub step_size: f64,
}

/// A set of rigid bodies advanced together by one solver.
#[derive(Debug)]
pub struct World {
    config: SimConfig,
    solver: Box<dyn OdeSolver>,
    system: RigidBodySystem,
    shapes: Vec<BodyShape>,
    time: f64,
}

impl World {
    /// Builds an empty world from a validated config.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let solver = create_solver(&config.solver, config.step_size)?;
        let system = RigidBodySystem::new(Box::new(Gravity { g: config.gravity }));
        info!(solver = %solver.kind(), step_size = config.step_size, "world created");
        Ok(Self {
            config,
            solver,
            system,
            shapes: Vec::new(),
            time: 0.0,
        })
    }

    /// Replaces the force model (gravity by default).
    pub fn set_force_model(&mut self, forces: Box<dyn ForceModel>) {
        self.system.set_forces(forces);
    }

    /// Adds a body whose geometry is described only by `local_bounds`
    /// (in its centre-of-mass frame). Pass [`Aabb::EMPTY`] to opt out of
    /// culling. Returns the body index.
    pub fn add_body(&mut self, body: RigidBody, local_bounds: Aabb) -> usize {
        self.shapes.push(BodyShape {
            com: Vec3::ZERO,
            bounds: local_bounds,
            bvh: None,
        });
        self.system.push(body)
    }

    /// Adds a uniformly dense mesh body of the given `mass`, placing its
    /// centre of mass at `position`. Returns the body index.
    pub fn add_mesh_body(
        &mut self,
        vertices: &[Vec3],
        indices: &[u32],
        mass: f64,
        position: Vec3,
        orientation: Quat,
    ) -> Result<usize> {
        let props = MassProperties::from_mesh(vertices, indices)?;
        let bvh = AabbNode::build(vertices, indices)?;
        let body = RigidBody::from_mass_properties(&props, mass)?
            .with_position(position)
            .with_orientation(orientation);
        debug!(
            volume = props.volume,
            leaves = bvh.leaf_count(),
            "mesh body added"
        );
        self.shapes.push(BodyShape {
            com: props.com,
            bounds: bvh.bounds(),
            bvh: Some(bvh),
        });
        Ok(self.system.push(body))
    }

    /// Advances the world by `dt`, then resolves whichever `candidates`
    /// survive broad-phase culling.
    ///
    /// Integration runs at the solver's current step size, so impulses
    /// applied during one tick shorten the steps of the next. With
    /// `restore_step_size` set, the configured step is put back after
    /// integration and before resolution.
    #[instrument(
        level = "debug",
        skip(self, candidates),
        fields(bodies = self.system.len(), candidates = candidates.len())
    )]
    pub fn step(&mut self, dt: f64, candidates: &[Contact]) -> Result<StepReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "tick length must be positive, got {dt}"
            )));
        }

        if !self.system.is_empty() {
            let system = &self.system;
            let x0 = system.pack_state();
            let mut failure = None;
            let mut derivative = |t: f64, x: &[f64], xdot: &mut [f64]| {
                if failure.is_none() {
                    failure = system.dxdt(t, x, xdot).err();
                }
            };
            let x1 = self.solver.step(&x0, self.time, self.time + dt, &mut derivative)?;
            if let Some(err) = failure {
                return Err(err);
            }
            self.system.unpack_state(&x1)?;
        }
        if self.config.restore_step_size {
            self.solver.set_step_size(self.config.step_size)?;
        }

        let contacts = self.cull(candidates);
        let culled = candidates.len() - contacts.len();
        let params = self.config.resolution_params();
        let solver: &mut dyn OdeSolver = self.solver.as_mut();
        let resolution =
            find_all_collisions(self.system.bodies_mut(), &contacts, &params, Some(solver));

        self.time += dt;
        Ok(StepReport {
            time: self.time,
            culled,
            resolution,
            step_size: self.solver.step_size(),
        })
    }

    /// Keeps contacts whose bodies' world bounds overlap, or that involve a
    /// body without bounds.
    fn cull(&self, candidates: &[Contact]) -> Vec<Contact> {
        let mut broad = AllPairs::new();
        for i in 0..self.shapes.len() {
            if let Some(bounds) = self.world_bounds(i).filter(|b| !b.is_empty()) {
                broad.upsert(i, bounds);
            }
        }
        let bounded = |i: usize| self.shapes.get(i).is_some_and(|s| !s.bounds.is_empty());
        candidates
            .iter()
            .filter(|c| {
                let both_bounded = bounded(c.a) && bounded(c.b);
                !both_bounded || broad.overlapping(c.a, c.b)
            })
            .copied()
            .collect()
    }

    /// Model matrix mapping mesh coordinates of body `index` to world space:
    /// `T(x) · R(q) · T(-com)`.
    pub fn model_matrix(&self, index: usize) -> Option<Mat4> {
        let body = self.system.bodies().get(index)?;
        let shape = self.shapes.get(index)?;
        let [cx, cy, cz] = shape.com.to_array();
        let to_com = Mat4::translation(-cx, -cy, -cz);
        Some(body.model_matrix().multiply(&to_com))
    }

    /// World-space bounds of body `index`.
    pub fn world_bounds(&self, index: usize) -> Option<Aabb> {
        let shape = self.shapes.get(index)?;
        Some(shape.bounds.transformed(&self.model_matrix(index)?))
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The integrator driving this world.
    pub fn solver(&self) -> &dyn OdeSolver {
        self.solver.as_ref()
    }

    /// All bodies, indexed as returned by the `add_*` methods.
    pub fn bodies(&self) -> &[RigidBody] {
        self.system.bodies()
    }

    /// Mutable body access, e.g. to set initial momenta.
    pub fn bodies_mut(&mut self) -> &mut [RigidBody] {
        self.system.bodies_mut()
    }

    /// Triangle hierarchy of a mesh body, in mesh coordinates.
    pub fn bvh(&self, index: usize) -> Option<&AabbNode> {
        self.shapes.get(index)?.bvh.as_ref()
    }
}
