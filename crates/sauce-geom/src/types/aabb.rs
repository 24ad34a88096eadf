// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use sauce_math::{Mat4, Vec3};

/// Axis-aligned bounding box.
///
/// Invariants:
/// - When `empty` is `false`, `min` components are less than or equal to
///   `max` components.
/// - An empty box bounds nothing: it overlaps nothing and is the identity of
///   [`Aabb::union`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
    empty: bool,
}

impl Aabb {
    /// The empty box.
    pub const EMPTY: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
        empty: true,
    };

    /// Constructs an AABB spanning two corners.
    ///
    /// Corners may be given in any order; the box takes the component-wise
    /// minimum and maximum so the `min <= max` invariant always holds.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min_components(&b),
            max: a.max_components(&b),
            empty: false,
        }
    }

    /// Returns the minimum corner (meaningless when [`Aabb::is_empty`]).
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner (meaningless when [`Aabb::is_empty`]).
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Returns `true` if the box bounds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Builds an AABB centered at `center` with half-extents `hx, hy, hz`.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, hx: f64, hy: f64, hz: f64) -> Self {
        let he = Vec3::new(hx.abs(), hy.abs(), hz.abs());
        Self::new(center.sub(&he), center.add(&he))
    }

    /// Builds the minimal AABB that contains all `points`.
    ///
    /// Returns [`Aabb::EMPTY`] for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |acc, p| acc.expanded_to(p))
    }

    /// Grows the box just enough to contain `p`.
    #[must_use]
    pub fn expanded_to(&self, p: &Vec3) -> Self {
        if self.empty {
            return Self {
                min: *p,
                max: *p,
                empty: false,
            };
        }
        Self {
            min: self.min.min_components(p),
            max: self.max.max_components(p),
            empty: false,
        }
    }

    /// Returns `true` if this AABB overlaps another (inclusive on faces).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.empty || other.empty {
            return false;
        }
        // Inclusive: a shared face, edge, or corner counts as overlap.
        (0..3).all(|axis| {
            self.min.component(axis) <= other.max.component(axis)
                && other.min.component(axis) <= self.max.component(axis)
        })
    }

    /// Returns `true` if `other` lies entirely inside this box (boundary inclusive).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        if other.empty {
            return true;
        }
        if self.empty {
            return false;
        }
        (0..3).all(|axis| {
            self.min.component(axis) <= other.min.component(axis)
                && other.max.component(axis) <= self.max.component(axis)
        })
    }

    /// Returns the union of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        match (self.empty, other.empty) {
            (true, _) => *other,
            (_, true) => *self,
            _ => Self {
                min: self.min.min_components(&other.min),
                max: self.max.max_components(&other.max),
                empty: false,
            },
        }
    }

    /// Edge lengths along each axis (zero for an empty box).
    #[must_use]
    pub fn extent(&self) -> Vec3 {
        if self.empty {
            return Vec3::ZERO;
        }
        self.max.sub(&self.min)
    }

    /// Index of the axis with the greatest extent; ties resolve to the lowest axis.
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        let mut best = 0;
        for axis in 1..3 {
            if e.component(axis) > e.component(best) {
                best = axis;
            }
        }
        best
    }

    /// Computes the AABB that bounds this box after transformation by `mat`.
    ///
    /// This evaluates the eight corners under the affine transform and builds a
    /// new axis-aligned box containing them.
    #[must_use]
    pub fn transformed(&self, mat: &Mat4) -> Self {
        if self.empty {
            return *self;
        }
        let [minx, miny, minz] = self.min.to_array();
        let [maxx, maxy, maxz] = self.max.to_array();
        let corners = [
            Vec3::new(minx, miny, minz),
            Vec3::new(minx, miny, maxz),
            Vec3::new(minx, maxy, minz),
            Vec3::new(minx, maxy, maxz),
            Vec3::new(maxx, miny, minz),
            Vec3::new(maxx, miny, maxz),
            Vec3::new(maxx, maxy, minz),
            Vec3::new(maxx, maxy, maxz),
        ];
        corners
            .iter()
            .map(|c| mat.transform_point(c))
            .fold(Self::EMPTY, |acc, p| acc.expanded_to(&p))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
