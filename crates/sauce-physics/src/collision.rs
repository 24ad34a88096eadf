// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Impulse-based contact classification and resolution.
//!
//! Contacts reference bodies by index into a body slice. Resolution mutates
//! momenta in place and refreshes velocities immediately, so later contacts
//! in the same pass observe the corrected motion.

use sauce_math::Vec3;
use tracing::{debug, instrument, warn};

use crate::body::RigidBody;
use crate::solver::OdeSolver;

/// Relative normal velocity at or below which a contact is colliding.
pub const THRESHOLD: f64 = 0.01;

/// A candidate point of contact between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the body owning the vertex (or first edge).
    pub a: usize,
    /// Index of the body owning the face (or second edge).
    pub b: usize,
    /// World-space contact point.
    pub point: Vec3,
    /// Outward unit normal of `b`'s face.
    pub normal: Vec3,
    /// Edge direction on `a` for edge/edge contacts.
    pub edge_a: Vec3,
    /// Edge direction on `b` for edge/edge contacts.
    pub edge_b: Vec3,
    /// `true` for vertex/face contacts, `false` for edge/edge.
    pub vertex_face: bool,
}

impl Contact {
    /// Vertex/face contact between `a`'s vertex at `point` and `b`'s face with `normal`.
    pub fn vertex_face(a: usize, b: usize, point: Vec3, normal: Vec3) -> Self {
        Self {
            a,
            b,
            point,
            normal,
            edge_a: Vec3::ZERO,
            edge_b: Vec3::ZERO,
            vertex_face: true,
        }
    }

    /// Edge/edge contact; the normal is `edge_a × edge_b`, normalised.
    pub fn edge_edge(a: usize, b: usize, point: Vec3, edge_a: Vec3, edge_b: Vec3) -> Self {
        let normal = edge_a.cross(&edge_b).normalize();
        Self {
            a,
            b,
            point,
            normal,
            edge_a,
            edge_b,
            vertex_face: false,
        }
    }

    /// `(a, b)` in ascending order.
    pub fn body_pair(&self) -> (usize, usize) {
        (self.a.min(self.b), self.a.max(self.b))
    }
}

/// Velocity of world point `p` rigidly attached to `body`.
pub fn point_velocity(body: &RigidBody, p: &Vec3) -> Vec3 {
    body.point_velocity(p)
}

/// `n · (ṗa - ṗb)`: negative when the bodies approach along the normal.
pub fn relative_normal_velocity(a: &RigidBody, b: &RigidBody, contact: &Contact) -> f64 {
    let pa = a.point_velocity(&contact.point);
    let pb = b.point_velocity(&contact.point);
    contact.normal.dot(&pa.sub(&pb))
}

/// True unless the contact is separating faster than `threshold`.
pub fn is_colliding(a: &RigidBody, b: &RigidBody, contact: &Contact, threshold: f64) -> bool {
    relative_normal_velocity(a, b, contact) <= threshold
}

/// [`is_colliding`] against [`THRESHOLD`], with bodies looked up by index.
///
/// Returns `false` when the contact references a missing body or the same
/// body twice.
pub fn colliding(bodies: &[RigidBody], contact: &Contact) -> bool {
    if contact.a == contact.b {
        return false;
    }
    match (bodies.get(contact.a), bodies.get(contact.b)) {
        (Some(a), Some(b)) => is_colliding(a, b, contact, THRESHOLD),
        _ => false,
    }
}

/// Applies the two-body contact impulse with restitution `epsilon` and
/// returns its magnitude `j`.
///
/// A contact referencing a missing body or the same body twice is left
/// alone and yields `0.0`.
pub fn collision(bodies: &mut [RigidBody], contact: &Contact, epsilon: f64) -> f64 {
    match pair_mut(bodies, contact.a, contact.b) {
        Some((a, b)) => apply_impulse(a, b, contact, epsilon),
        None => 0.0,
    }
}

fn apply_impulse(a: &mut RigidBody, b: &mut RigidBody, contact: &Contact, epsilon: f64) -> f64 {
    let n = contact.normal;
    let ra = contact.point.sub(&a.position);
    let rb = contact.point.sub(&b.position);
    let vrel = relative_normal_velocity(a, b, contact);

    let angular_a = n.dot(&a.inertia_inv_world.mul_vec(&ra.cross(&n)).cross(&ra));
    let angular_b = n.dot(&b.inertia_inv_world.mul_vec(&rb.cross(&n)).cross(&rb));
    let denominator = 1.0 / a.mass + 1.0 / b.mass + angular_a + angular_b;
    if !(denominator.is_finite() && denominator > 0.0) {
        return 0.0;
    }
    let j = -(1.0 + epsilon) * vrel / denominator;
    let impulse = n.scale(j);

    a.linear_momentum += impulse;
    b.linear_momentum -= impulse;
    a.angular_momentum += ra.cross(&impulse);
    b.angular_momentum -= rb.cross(&impulse);
    a.update_velocities();
    b.update_velocities();
    j
}

/// Disjoint mutable borrows of two distinct bodies.
fn pair_mut(
    bodies: &mut [RigidBody],
    a: usize,
    b: usize,
) -> Option<(&mut RigidBody, &mut RigidBody)> {
    if a == b || a >= bodies.len() || b >= bodies.len() {
        return None;
    }
    if a < b {
        let (lo, hi) = bodies.split_at_mut(b);
        Some((&mut lo[a], &mut hi[0]))
    } else {
        let (lo, hi) = bodies.split_at_mut(a);
        Some((&mut hi[0], &mut lo[b]))
    }
}

/// Knobs for [`find_all_collisions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionParams {
    /// Restitution `epsilon` in `[0, 1]`.
    pub restitution: f64,
    /// Classification threshold on relative normal velocity.
    pub threshold: f64,
    /// Floor for solver step halving.
    pub min_step_size: f64,
    /// Maximum number of full scans over the contact list.
    pub max_passes: usize,
}

impl Default for ResolutionParams {
    fn default() -> Self {
        Self {
            restitution: 0.5,
            threshold: THRESHOLD,
            min_step_size: 1e-8,
            max_passes: 64,
        }
    }
}

/// Outcome of [`find_all_collisions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolutionReport {
    /// Full scans performed, including the final clean one.
    pub passes: usize,
    /// Impulses applied across all passes.
    pub impulses: usize,
    /// Whether a scan completed without finding a colliding contact.
    pub converged: bool,
}

/// Resolves colliding contacts until a full scan finds none or the pass cap
/// is reached.
///
/// Every applied impulse is reported to `solver` (when present) through
/// [`OdeSolver::on_discontinuity`].
#[instrument(level = "debug", skip_all, fields(contacts = contacts.len()))]
pub fn find_all_collisions(
    bodies: &mut [RigidBody],
    contacts: &[Contact],
    params: &ResolutionParams,
    mut solver: Option<&mut dyn OdeSolver>,
) -> ResolutionReport {
    let mut report = ResolutionReport::default();
    while report.passes < params.max_passes {
        report.passes += 1;
        let mut resolved = 0_usize;
        for contact in contacts {
            let Some((a, b)) = pair_mut(bodies, contact.a, contact.b) else {
                continue;
            };
            if !is_colliding(a, b, contact, params.threshold) {
                continue;
            }
            apply_impulse(a, b, contact, params.restitution);
            resolved += 1;
            if let Some(s) = solver.as_deref_mut() {
                s.on_discontinuity(params.min_step_size);
            }
        }
        debug!(pass = report.passes, resolved, "collision pass");
        report.impulses += resolved;
        if resolved == 0 {
            report.converged = true;
            return report;
        }
    }
    warn!(
        passes = report.passes,
        impulses = report.impulses,
        "collision resolution hit pass cap without settling"
    );
    report
}
