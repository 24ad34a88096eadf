// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by the kernel (transform, AABB).
//!
//! Overlap semantics are inclusive on faces to avoid pair churn on contact
//! boundaries.

#[doc = "Axis-aligned bounding boxes (world or body space)."]
pub mod aabb;
#[doc = "Rigid transforms with non-uniform scale."]
pub mod transform;
