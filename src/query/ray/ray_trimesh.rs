use crate::math::Real;
use crate::query::details::local_ray_intersection_with_triangle;
use crate::query::{Ray, RayCast, RayIntersection};
use crate::shape::{FeatureId, TriMesh};

impl RayCast for TriMesh {
    fn cast_local_ray_and_get_normal(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
    ) -> Option<RayIntersection> {
        let best = self.bvh().cast_ray(ray, max_time_of_impact, |tri_id| {
            let tri = self.triangle(tri_id);
            local_ray_intersection_with_triangle(&tri.a, &tri.b, &tri.c, ray)
                .map(|inter| inter.time_of_impact)
        });

        best.and_then(|(tri_id, _)| {
            // Re-run the kernel on the winning triangle to recover its normal.
            let tri = self.triangle(tri_id);
            let inter = local_ray_intersection_with_triangle(&tri.a, &tri.b, &tri.c, ray)?;
            Some(RayIntersection::new(
                inter.time_of_impact,
                inter.normal,
                FeatureId::Face(tri_id),
            ))
        })
    }

    fn intersects_local_ray(&self, ray: &Ray, max_time_of_impact: Real) -> bool {
        self.bvh().intersects_ray(ray, max_time_of_impact, |tri_id| {
            let tri = self.triangle(tri_id);
            local_ray_intersection_with_triangle(&tri.a, &tri.b, &tri.c, ray)
                .map(|inter| inter.time_of_impact)
        })
    }
}
