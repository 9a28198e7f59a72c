use crate::math::{Point, Real};
use crate::query::{Ray, RayCast, RayIntersection};
use crate::shape::{FeatureId, Triangle};

impl RayCast for Triangle {
    #[inline]
    fn cast_local_ray_and_get_normal(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
    ) -> Option<RayIntersection> {
        let inter = local_ray_intersection_with_triangle(&self.a, &self.b, &self.c, ray)?;

        if inter.time_of_impact <= max_time_of_impact {
            Some(inter)
        } else {
            None
        }
    }
}

/// Computes the intersection between a triangle and a ray.
///
/// The triangle is double-sided: a hit is reported whichever side the ray
/// comes from. The reported normal faces the ray origin, and the feature is
/// `FeatureId::Face(0)` when the ray enters against the triangle winding
/// normal and `FeatureId::Face(1)` otherwise.
pub fn local_ray_intersection_with_triangle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    ray: &Ray,
) -> Option<RayIntersection> {
    let ab = *b - *a;
    let ac = *c - *a;

    // normal
    let n = ab.cross(&ac);
    let d = n.dot(&ray.dir);

    // the normal and the ray direction are parallel
    if d == 0.0 {
        return None;
    }

    let ap = ray.origin - *a;
    let t = ap.dot(&n);

    // the ray points away from the halfspace containing the triangle
    if (t < 0.0 && d < 0.0) || (t > 0.0 && d > 0.0) {
        return None;
    }

    let fid = if d < 0.0 { 0 } else { 1 };

    //
    // intersection: compute barycentric coordinates
    //
    let e = -ray.dir.cross(&ap);
    let abs_d = d.abs();

    let (v, w) = if t < 0.0 {
        (-ac.dot(&e), ab.dot(&e))
    } else {
        (ac.dot(&e), -ab.dot(&e))
    };

    if v < 0.0 || v > abs_d || w < 0.0 || v + w > abs_d {
        return None;
    }

    let toi = t.abs() / abs_d;
    let normal = if t < 0.0 {
        -n.normalize()
    } else {
        n.normalize()
    };

    Some(RayIntersection::new(toi, normal, FeatureId::Face(fid)))
}
