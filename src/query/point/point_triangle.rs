use crate::math::{Point, Real};
use crate::query::{PointProjection, PointQuery};
use crate::shape::{FeatureId, Triangle};

impl PointQuery for Triangle {
    #[inline]
    fn project_local_point_and_get_feature(
        &self,
        pt: &Point<Real>,
    ) -> (PointProjection, FeatureId) {
        project_local_point_on_triangle(&self.a, &self.b, &self.c, pt)
    }
}

/// Projects a point on a triangle, using the Voronoï regions of its features.
///
/// Returns the projection together with the feature (vertex, edge or face)
/// the point landed on. Edge 0 is AB, edge 1 is BC, edge 2 is AC.
pub fn project_local_point_on_triangle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    pt: &Point<Real>,
) -> (PointProjection, FeatureId) {
    let ab = *b - *a;
    let ac = *c - *a;
    let ap = *pt - *a;

    let ab_ap = ab.dot(&ap);
    let ac_ap = ac.dot(&ap);

    if ab_ap <= 0.0 && ac_ap <= 0.0 {
        // Voronoï region of `a`.
        return (compute_result(pt, *a), FeatureId::Vertex(0));
    }

    let bp = *pt - *b;
    let ab_bp = ab.dot(&bp);
    let ac_bp = ac.dot(&bp);

    if ab_bp >= 0.0 && ac_bp <= ab_bp {
        // Voronoï region of `b`.
        return (compute_result(pt, *b), FeatureId::Vertex(1));
    }

    let cp = *pt - *c;
    let ab_cp = ab.dot(&cp);
    let ac_cp = ac.dot(&cp);

    if ac_cp >= 0.0 && ab_cp <= ac_cp {
        // Voronoï region of `c`.
        return (compute_result(pt, *c), FeatureId::Vertex(2));
    }

    // Voronoï region of `ab`.
    let vc = ab_ap * ac_bp - ab_bp * ac_ap;
    if vc <= 0.0 && ab_ap >= 0.0 && ab_bp <= 0.0 {
        let t = ab_ap / (ab_ap - ab_bp);
        return (compute_result(pt, *a + ab * t), FeatureId::Edge(0));
    }

    // Voronoï region of `ac`.
    let vb = ab_cp * ac_ap - ab_ap * ac_cp;
    if vb <= 0.0 && ac_ap >= 0.0 && ac_cp <= 0.0 {
        let t = ac_ap / (ac_ap - ac_cp);
        return (compute_result(pt, *a + ac * t), FeatureId::Edge(2));
    }

    // Voronoï region of `bc`.
    let va = ab_bp * ac_cp - ab_cp * ac_bp;
    if va <= 0.0 && ac_bp - ab_bp >= 0.0 && ab_cp - ac_cp >= 0.0 {
        let t = (ac_bp - ab_bp) / (ac_bp - ab_bp + ab_cp - ac_cp);
        return (compute_result(pt, *b + (*c - *b) * t), FeatureId::Edge(1));
    }

    // The point projects inside of the triangle face.
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    let proj = *a + ab * v + ac * w;

    (compute_result(pt, proj), FeatureId::Face(0))
}

#[inline]
fn compute_result(pt: &Point<Real>, proj: Point<Real>) -> PointProjection {
    PointProjection::new(relative_eq!(proj, *pt), proj)
}
