// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use sauce_math::{Mat4, Quat, Vec3};

/// Placement of a body (or mesh) in world space.
///
/// Applied as scale, then rotation, then translation. Simulated bodies always
/// use unit scale; see [`Transform::rigid`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

const UNIT_SCALE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

impl Transform {
    /// No translation, no rotation, unit scale.
    pub const fn identity() -> Self {
        Self::rigid(Vec3::ZERO, Quat::identity())
    }

    /// General placement with per-axis scale.
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Translation plus rotation, the pose of a rigid body.
    pub const fn rigid(translation: Vec3, rotation: Quat) -> Self {
        Self::new(translation, rotation, UNIT_SCALE)
    }

    /// World-space origin of the local frame.
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Orientation; may drift from unit length, normalised in [`Self::to_mat4`].
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Per-axis scale.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// `true` when the scale is exactly one on every axis.
    pub fn is_rigid(&self) -> bool {
        self.scale == UNIT_SCALE
    }

    /// Maps a local point to world space.
    pub fn apply(&self, local: &Vec3) -> Vec3 {
        self.to_mat4().transform_point(local)
    }

    /// Column-major model matrix `T · R · S`.
    pub fn to_mat4(&self) -> Mat4 {
        let rigid = Mat4::from_rotation_translation(&self.rotation, &self.translation);
        if self.is_rigid() {
            return rigid;
        }
        let [sx, sy, sz] = self.scale.to_array();
        rigid.multiply(&Mat4::scale(sx, sy, sz))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
