// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Median-split bounding-volume hierarchy over mesh triangles.
//!
//! The tree is built once per mesh and never mutated; rebuild it wholesale if
//! the geometry changes. Splits are balanced by triangle count (not SAH):
//! at each interior node the triangles are ordered by centroid along the
//! longest box axis and divided at the median.
//!
//! Ordering is canonical: centroids are compared with `total_cmp` under a
//! stable sort, so identical inputs always yield identical trees.

use sauce_math::Vec3;

use crate::mesh::{validate_mesh, MeshError};
use crate::types::aabb::Aabb;

/// Maximum node depth; the root sits at depth 0.
pub const MAX_DEPTH: usize = 16;

/// A node whose index list is at most this long (two triangles) becomes a leaf.
pub const LEAF_MAX_INDICES: usize = 6;

/// Node of the triangle BVH.
///
/// Children are owned exclusively. Interior nodes carry no indices; leaves
/// carry the flat vertex-index list (three per triangle) of the triangles
/// they cover.
#[derive(Debug, Clone, PartialEq)]
pub struct AabbNode {
    bounds: Aabb,
    left: Option<Box<AabbNode>>,
    right: Option<Box<AabbNode>>,
    indices: Vec<u32>,
}

impl AabbNode {
    /// Builds a tree over every triangle of the mesh.
    ///
    /// An empty index list yields a single leaf with an empty box.
    pub fn build(vertices: &[Vec3], indices: &[u32]) -> Result<Self, MeshError> {
        validate_mesh(vertices, indices)?;
        Ok(Self::build_at_depth(vertices, indices.to_vec(), 0))
    }

    fn build_at_depth(vertices: &[Vec3], indices: Vec<u32>, depth: usize) -> Self {
        let bounds = bounds_of(vertices, &indices);
        if indices.len() <= LEAF_MAX_INDICES || depth >= MAX_DEPTH {
            return Self {
                bounds,
                left: None,
                right: None,
                indices,
            };
        }

        let axis = bounds.longest_axis();
        let mut tris: Vec<[u32; 3]> = indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();
        tris.sort_by(|a, b| {
            let ka = centroid_sum(vertices, a, axis);
            ka.total_cmp(&centroid_sum(vertices, b, axis))
        });
        let mid = tris.len() / 2;
        let left: Vec<u32> = tris[..mid].iter().flatten().copied().collect();
        let right: Vec<u32> = tris[mid..].iter().flatten().copied().collect();

        Self {
            bounds,
            left: Some(Box::new(Self::build_at_depth(vertices, left, depth + 1))),
            right: Some(Box::new(Self::build_at_depth(vertices, right, depth + 1))),
            indices: Vec::new(),
        }
    }

    /// Box enclosing every triangle in this subtree.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Left child, if this is an interior node.
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// Right child, if this is an interior node.
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// `true` for leaves.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Flat vertex indices covered by this node (empty for interior nodes).
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of triangles stored directly in this node.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Depth of the deepest node below (and including) this one; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        let l = self.left().map_or(0, |n| n.depth() + 1);
        let r = self.right().map_or(0, |n| n.depth() + 1);
        l.max(r)
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.left().map_or(0, Self::leaf_count) + self.right().map_or(0, Self::leaf_count)
    }

    /// Calls `f(leaf, depth)` for each leaf in left-to-right order.
    pub fn visit_leaves<F: FnMut(&Self, usize)>(&self, mut f: F) {
        self.visit_leaves_inner(0, &mut f);
    }

    fn visit_leaves_inner<F: FnMut(&Self, usize)>(&self, depth: usize, f: &mut F) {
        if self.is_leaf() {
            f(self, depth);
            return;
        }
        for child in [self.left(), self.right()].into_iter().flatten() {
            child.visit_leaves_inner(depth + 1, f);
        }
    }

    /// Returns the triangles of every leaf whose box overlaps `query`.
    ///
    /// Triangles are returned as vertex-index triples in left-to-right leaf
    /// order. This is a conservative broad-phase answer: a returned triangle's
    /// leaf box overlaps the query, not necessarily the triangle itself.
    pub fn query(&self, query: &Aabb) -> Vec<[u32; 3]> {
        let mut out = Vec::new();
        self.query_into(query, &mut out);
        out
    }

    fn query_into(&self, query: &Aabb, out: &mut Vec<[u32; 3]>) {
        if !self.bounds.overlaps(query) {
            return;
        }
        if self.is_leaf() {
            out.extend(self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]));
            return;
        }
        for child in [self.left(), self.right()].into_iter().flatten() {
            child.query_into(query, out);
        }
    }
}

fn bounds_of(vertices: &[Vec3], indices: &[u32]) -> Aabb {
    indices
        .iter()
        .map(|&i| &vertices[i as usize])
        .fold(Aabb::EMPTY, |acc, v| acc.expanded_to(v))
}

// Sum rather than mean: ordering by `a+b+c` equals ordering by centroid.
fn centroid_sum(vertices: &[Vec3], tri: &[u32; 3], axis: usize) -> f64 {
    tri.iter()
        .map(|&i| vertices[i as usize].component(axis))
        .sum()
}
