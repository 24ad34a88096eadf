// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for the rigid-body kernel.

use sauce_geom::MeshError;
use thiserror::Error;

/// Errors surfaced by mass-property extraction, solvers, and configuration.
///
/// Collision classification and resolution are total over well-formed
/// contacts and never produce these.
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// A caller supplied an argument outside the operation's domain
    /// (non-positive step size, empty state, reversed time range, bad mesh).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The mesh encloses (numerically) zero volume, so moments cannot be normalised.
    #[error("degenerate geometry: enclosed volume {volume:e} is too small")]
    DegenerateGeometry {
        /// Six times the signed volume accumulated from the mesh.
        volume: f64,
    },
    /// An inertia tensor could not be inverted.
    #[error("singular matrix: determinant {determinant:e}")]
    SingularMatrix {
        /// Determinant of the offending matrix.
        determinant: f64,
    },
    /// Simulation config could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<MeshError> for PhysicsError {
    fn from(err: MeshError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PhysicsError>;
