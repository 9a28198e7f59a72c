//! Geometric shapes: triangles, clothing meshes, body meshes.

pub use self::body_mesh::{BodyMesh, BodyMeshBuilderError};
pub use self::triangle::Triangle;
pub use self::trimesh::{TriMesh, TriMeshBuilderError};

mod body_mesh;
mod triangle;
mod trimesh;

/// An identifier of a feature of a shape.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum FeatureId {
    /// Shape-dependent identifier of a vertex.
    Vertex(u32),
    /// Shape-dependent identifier of an edge.
    Edge(u32),
    /// Shape-dependent identifier of a face.
    Face(u32),
    /// Unknown identifier.
    #[default]
    Unknown,
}

impl FeatureId {
    /// The value of the identifier if `self` is a face.
    pub fn face(self) -> Option<u32> {
        match self {
            FeatureId::Face(id) => Some(id),
            _ => None,
        }
    }
}
