// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![doc = r"Geometry primitives for the Sauce rigid-body kernel.

This crate provides:
- Axis-aligned bounding boxes (`Aabb`) with an explicit empty state.
- Rigid transforms (`Transform`) that produce the model matrix handed to the
  renderer.
- A median-split bounding-volume hierarchy over mesh triangles (`AabbNode`).
- A minimal broad-phase trait and an AABB-based pairing structure.

Design notes:
- Overlap is inclusive on faces: touching boxes count as overlapping.
- Ordering of pair outputs and of BVH splits is canonical, so identical
  inputs produce identical trees and pair lists.
"]

/// Broad-phase pairing over per-body bounds.
pub mod broad;
/// Bounding-volume hierarchy over mesh triangles.
pub mod bvh;
/// Mesh input validation shared by mass-property and BVH builders.
pub mod mesh;
/// Foundational geometric types.
pub mod types;

pub use broad::pairs::{AllPairs, BroadPhase};
pub use bvh::{AabbNode, LEAF_MAX_INDICES, MAX_DEPTH};
pub use mesh::{validate_mesh, MeshError};
pub use types::aabb::Aabb;
pub use types::transform::Transform;
