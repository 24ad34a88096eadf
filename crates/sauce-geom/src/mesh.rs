// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use sauce_math::Vec3;
use thiserror::Error;

/// Reasons a vertex/index pair cannot be interpreted as a triangle mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The flat index list does not describe whole triangles.
    #[error("index count {0} is not a multiple of 3")]
    RaggedIndices(usize),
    /// A triangle references a vertex that does not exist.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value.
        index: u32,
        /// Number of vertices supplied.
        vertex_count: usize,
    },
}

/// Checks the mesh input contract: whole triangles, every index in range.
pub fn validate_mesh(vertices: &[Vec3], indices: &[u32]) -> Result<(), MeshError> {
    if indices.len() % 3 != 0 {
        return Err(MeshError::RaggedIndices(indices.len()));
    }
    match indices.iter().find(|&&i| i as usize >= vertices.len()) {
        Some(&index) => Err(MeshError::IndexOutOfRange {
            index,
            vertex_count: vertices.len(),
        }),
        None => Ok(()),
    }
}

/// Iterates the triangles of a validated mesh as vertex triples.
pub fn triangles<'a>(
    vertices: &'a [Vec3],
    indices: &'a [u32],
) -> impl Iterator<Item = [Vec3; 3]> + 'a {
    indices.chunks_exact(3).map(move |t| {
        [vertices[t[0] as usize], vertices[t[1] as usize], vertices[t[2] as usize]]
    })
}
