// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Body-level broad phase: which pairs of bodies are close enough that their
//! contacts are worth resolving.
//!
//! Pair ids are body indices, reported as `(low, high)` in ascending order.
//! Touching bounds count as overlapping.

/// Trait and brute-force implementation.
pub mod pairs;
