use crate::math::{Isometry, Point, Real};
use crate::shape::FeatureId;

/// Description of the projection of a point on a shape.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointProjection {
    /// Whether or not the point to project was lying exactly on the shape.
    pub is_inside: bool,
    /// The projection result.
    pub point: Point<Real>,
}

impl PointProjection {
    /// Initializes a new `PointProjection`.
    pub fn new(is_inside: bool, point: Point<Real>) -> Self {
        PointProjection { is_inside, point }
    }

    /// Transforms `self.point` by `pos`.
    pub fn transform_by(&self, pos: &Isometry<Real>) -> Self {
        PointProjection {
            is_inside: self.is_inside,
            point: pos * self.point,
        }
    }

    /// Returns `true` if `Self::is_inside` is `true` or if the distance
    /// between the projected point and `original_point` is smaller than
    /// `min_dist`.
    pub fn is_inside_eps(&self, original_point: &Point<Real>, min_dist: Real) -> bool {
        self.is_inside || na::distance_squared(original_point, &self.point) < min_dist * min_dist
    }
}

/// Trait of objects that can be tested for point inclusion and projection.
pub trait PointQuery {
    /// Projects a point on `self`.
    ///
    /// The point is assumed to be expressed in the local-space of `self`.
    fn project_local_point(&self, pt: &Point<Real>) -> PointProjection {
        self.project_local_point_and_get_feature(pt).0
    }

    /// Projects a point on the boundary of `self` and returns the id of the
    /// feature the point was projected on.
    fn project_local_point_and_get_feature(&self, pt: &Point<Real>)
        -> (PointProjection, FeatureId);

    /// Projects a point on `self`, unless the projection lies further than
    /// the given max distance.
    ///
    /// The point is assumed to be expressed in the local-space of `self`.
    fn project_local_point_with_max_dist(
        &self,
        pt: &Point<Real>,
        max_dist: Real,
    ) -> Option<(PointProjection, FeatureId)> {
        let (proj, feature) = self.project_local_point_and_get_feature(pt);
        if na::distance(&proj.point, pt) > max_dist {
            None
        } else {
            Some((proj, feature))
        }
    }

    /// Computes the minimal distance between a point and `self`.
    fn distance_to_local_point(&self, pt: &Point<Real>) -> Real {
        let proj = self.project_local_point(pt);
        na::distance(pt, &proj.point)
    }

    /// Projects a point on `self` transformed by `m`.
    fn project_point(&self, m: &Isometry<Real>, pt: &Point<Real>) -> PointProjection {
        self.project_local_point(&m.inverse_transform_point(pt))
            .transform_by(m)
    }

    /// Computes the minimal distance between a point and `self` transformed by `m`.
    fn distance_to_point(&self, m: &Isometry<Real>, pt: &Point<Real>) -> Real {
        self.distance_to_local_point(&m.inverse_transform_point(pt))
    }
}
