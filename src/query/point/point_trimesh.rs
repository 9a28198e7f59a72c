use crate::math::{Point, Real};
use crate::query::details::project_local_point_on_triangle;
use crate::query::{PointProjection, PointQuery};
use crate::shape::{FeatureId, TriMesh};

impl PointQuery for TriMesh {
    fn project_local_point_and_get_feature(
        &self,
        pt: &Point<Real>,
    ) -> (PointProjection, FeatureId) {
        let best = self.bvh().project_point(pt, |tri_id| {
            let tri = self.triangle(tri_id);
            project_local_point_on_triangle(&tri.a, &tri.b, &tri.c, pt)
                .0
                .point
        });

        match best {
            Some((tri_id, proj)) => (
                PointProjection::new(relative_eq!(proj, *pt), proj),
                // The triangle index is a more useful feature id here than
                // the feature within that triangle.
                FeatureId::Face(tri_id),
            ),
            // Empty trees cannot happen for `TriMesh` (builder rejects
            // empty index buffers), but stay total anyway.
            None => (PointProjection::new(false, *pt), FeatureId::Unknown),
        }
    }
}
