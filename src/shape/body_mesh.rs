use crate::math::{Point, Point2, Real, Vector};

/// Indicates an inconsistency while building a body mesh.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyMeshBuilderError {
    /// An index refers past the end of the vertex buffer.
    #[error("the triangle {triangle} refers to the out-of-bounds vertex {index}.")]
    OutOfBoundsIndex {
        /// The triangle containing the out-of-bounds index.
        triangle: u32,
        /// The out-of-bounds vertex index.
        index: u32,
    },
}

/// The mesh whose vertices get hidden: positions, normals, UV channels and
/// triangles.
///
/// A body mesh is an immutable input: the pipeline never mutates it, only
/// produces derived copies. Normal and UV buffers are allowed to be empty or
/// of mismatched length at construction (meshes exported without normals are
/// common); the detection entry point validates whatever buffers it actually
/// needs and reports a structured failure instead.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyMesh {
    positions: Vec<Point<Real>>,
    normals: Vec<Vector<Real>>,
    uv_channels: Vec<Vec<Point2<Real>>>,
    indices: Vec<[u32; 3]>,
}

impl BodyMesh {
    /// Creates a body mesh from its raw buffers.
    ///
    /// Only triangle indices are validated here. See the type-level
    /// documentation for how mismatched attribute buffers are handled.
    pub fn new(
        positions: Vec<Point<Real>>,
        normals: Vec<Vector<Real>>,
        uv_channels: Vec<Vec<Point2<Real>>>,
        indices: Vec<[u32; 3]>,
    ) -> Result<BodyMesh, BodyMeshBuilderError> {
        for (tri_id, idx) in indices.iter().enumerate() {
            for k in idx {
                if *k as usize >= positions.len() {
                    return Err(BodyMeshBuilderError::OutOfBoundsIndex {
                        triangle: tri_id as u32,
                        index: *k,
                    });
                }
            }
        }

        Ok(BodyMesh {
            positions,
            normals,
            uv_channels,
            indices,
        })
    }

    /// The number of vertices of this mesh.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// The vertex positions of this mesh.
    #[inline]
    pub fn positions(&self) -> &[Point<Real>] {
        &self.positions
    }

    /// The vertex normals of this mesh. May be empty.
    #[inline]
    pub fn normals(&self) -> &[Vector<Real>] {
        &self.normals
    }

    /// The UV buffer of the given channel, if that channel exists.
    #[inline]
    pub fn uv_channel(&self, channel: usize) -> Option<&[Point2<Real>]> {
        self.uv_channels.get(channel).map(|uvs| &uvs[..])
    }

    /// The number of UV channels carried by this mesh.
    #[inline]
    pub fn num_uv_channels(&self) -> usize {
        self.uv_channels.len()
    }

    /// The triangle indices of this mesh.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Returns a copy of this mesh with the given UV channel replaced.
    ///
    /// If `channel` is past the current number of channels, intermediate
    /// channels are filled with zeroed UVs so the requested channel index is
    /// preserved in the output.
    pub fn with_uv_channel(&self, channel: usize, uvs: Vec<Point2<Real>>) -> BodyMesh {
        let mut result = self.clone();

        while result.uv_channels.len() <= channel {
            result
                .uv_channels
                .push(vec![Point2::origin(); self.positions.len()]);
        }
        result.uv_channels[channel] = uvs;
        result
    }

    /// Returns a copy of this mesh without the triangles whose three corners
    /// are all flagged in `hidden`.
    ///
    /// Vertex buffers are left untouched; only the index buffer shrinks.
    /// `hidden` must have one entry per vertex.
    pub fn without_hidden_triangles(&self, hidden: &[bool]) -> BodyMesh {
        let mut result = self.clone();
        result.indices.retain(|idx| {
            !idx.iter().all(|i| hidden.get(*i as usize).copied().unwrap_or(false))
        });
        result
    }
}
