// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::collections::BTreeMap;

use crate::types::aabb::Aabb;

/// Pairing structure over per-body world bounds, keyed by body index.
///
/// Pairs come back as `(low, high)` with `low < high`, sorted ascending, so
/// two structures holding the same boxes report the same list regardless of
/// insertion order.
pub trait BroadPhase {
    /// Sets the bounds of body `id`, inserting it if absent.
    fn upsert(&mut self, id: usize, aabb: Aabb);
    /// Forgets body `id`.
    fn remove(&mut self, id: usize);
    /// Every overlapping pair, canonical and sorted.
    fn pairs(&self) -> Vec<(usize, usize)>;
    /// Whether bodies `a` and `b` are both known and their bounds overlap.
    fn overlapping(&self, a: usize, b: usize) -> bool;
}

/// Brute-force [`BroadPhase`]: tests every pair of stored boxes.
#[derive(Debug, Default, Clone)]
pub struct AllPairs {
    bounds: BTreeMap<usize, Aabb>,
}

impl AllPairs {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bodies with bounds.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// `true` when no bounds are stored.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl BroadPhase for AllPairs {
    fn upsert(&mut self, id: usize, aabb: Aabb) {
        self.bounds.insert(id, aabb);
    }

    fn remove(&mut self, id: usize) {
        self.bounds.remove(&id);
    }

    fn pairs(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut rest = self.bounds.iter();
        // Keys ascend, so `(a, b)` with `b` drawn from the tail is already canonical.
        while let Some((&a, box_a)) = rest.next() {
            out.extend(
                rest.clone()
                    .filter(|(_, box_b)| box_a.overlaps(box_b))
                    .map(|(&b, _)| (a, b)),
            );
        }
        out
    }

    fn overlapping(&self, a: usize, b: usize) -> bool {
        a != b
            && matches!(
                (self.bounds.get(&a), self.bounds.get(&b)),
                (Some(x), Some(y)) if x.overlaps(y)
            )
    }
}
