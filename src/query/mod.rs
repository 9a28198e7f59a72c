//! Geometric queries against clothing meshes: ray casting and point projection.

pub use self::point::{PointProjection, PointQuery};
pub use self::ray::{Ray, RayCast, RayIntersection};

pub mod details {
    //! Lower-level geometric kernels backing the queries.

    pub use super::point::point_triangle::project_local_point_on_triangle;
    pub use super::ray::ray_triangle::local_ray_intersection_with_triangle;
}

mod point;
mod ray;
