//! Axis-aligned bounding volumes used by the spatial partitioning.

pub use self::aabb::Aabb;

mod aabb;
