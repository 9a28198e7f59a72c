use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::partitioning::Bvh;
use crate::shape::Triangle;

/// Indicates an inconsistency while building a triangle mesh.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriMeshBuilderError {
    /// A triangle mesh must contain at least one triangle.
    #[error("a triangle mesh must contain at least one triangle.")]
    EmptyIndices,
    /// An index refers past the end of the vertex buffer.
    #[error("the triangle {triangle} refers to the out-of-bounds vertex {index}.")]
    OutOfBoundsIndex {
        /// The triangle containing the out-of-bounds index.
        triangle: u32,
        /// The out-of-bounds vertex index.
        index: u32,
    },
}

/// A triangle mesh with a bounding-volume-hierarchy acceleration structure.
///
/// This is the shape used for clothing geometry: detection queries (ray
/// casts, point projections) run against it through the BVH built at
/// construction time. The buffers are immutable once built.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TriMesh {
    vertices: Vec<Point<Real>>,
    indices: Vec<[u32; 3]>,
    bvh: Bvh,
}

impl TriMesh {
    /// Creates a triangle mesh from a vertex buffer and an index buffer.
    pub fn new(
        vertices: Vec<Point<Real>>,
        indices: Vec<[u32; 3]>,
    ) -> Result<TriMesh, TriMeshBuilderError> {
        if indices.is_empty() {
            return Err(TriMeshBuilderError::EmptyIndices);
        }

        for (tri_id, idx) in indices.iter().enumerate() {
            for k in idx {
                if *k as usize >= vertices.len() {
                    return Err(TriMeshBuilderError::OutOfBoundsIndex {
                        triangle: tri_id as u32,
                        index: *k,
                    });
                }
            }
        }

        let aabbs: Vec<_> = indices
            .iter()
            .map(|idx| Aabb::from_points(idx.iter().map(|i| &vertices[*i as usize])))
            .collect();
        let bvh = Bvh::new(&aabbs);

        Ok(TriMesh {
            vertices,
            indices,
            bvh,
        })
    }

    /// The vertex buffer of this mesh.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The index buffer of this mesh.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// The number of triangles on this mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// Gets the triangle with the given index.
    ///
    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn triangle(&self, i: u32) -> Triangle {
        let idx = self.indices[i as usize];
        Triangle::new(
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        )
    }

    /// The AABB of this mesh, in its local space.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        self.bvh
            .root_aabb()
            .unwrap_or_else(|| Aabb::from_points(&self.vertices))
    }

    /// The acceleration structure of this mesh.
    #[inline]
    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }
}
