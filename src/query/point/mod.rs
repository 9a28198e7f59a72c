//! Point projection.

pub use self::point_query::{PointProjection, PointQuery};

pub(crate) mod point_triangle;

mod point_query;
mod point_trimesh;
