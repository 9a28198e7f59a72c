//! Ray casting.

pub use self::ray::{Ray, RayCast, RayIntersection};

pub(crate) mod ray_triangle;

mod ray;
mod ray_trimesh;
