use crate::detection::{CoverageMask, DetectionConfig, DetectionError, DetectionInput};
use crate::math::{Point, Real, Vector};
use crate::query::PointQuery;
use crate::shape::TriMesh;

/// Whether a body vertex (expressed in clothing-local space) is covered by
/// the clothing mesh, by nearest-point search.
///
/// The front-facing bias rejects matches on clothing facing away from the
/// body surface (e.g. the far side of a sleeve), which the raw distance test
/// would accept.
pub(super) fn vertex_covered_by_proximity(
    clothing: &TriMesh,
    pt: &Point<Real>,
    normal: &Vector<Real>,
    tolerance: Real,
) -> bool {
    let Some((proj, feature)) = clothing.project_local_point_with_max_dist(pt, tolerance) else {
        return false;
    };

    if proj.is_inside {
        // The vertex lies exactly on the clothing surface.
        return true;
    }

    match feature.face() {
        Some(tri_id) => clothing.triangle(tri_id).scaled_normal().dot(normal) > 0.0,
        None => false,
    }
}

/// Proximity detection: a vertex is hidden iff the nearest point of the
/// clothing mesh is within `proximity_tolerance` and plausibly occludes it.
pub(super) fn detect_proximity(
    input: &DetectionInput,
    config: &DetectionConfig,
) -> Result<CoverageMask, DetectionError> {
    let clothing = input.required_clothing(config.method)?;
    input.checked_normals()?;

    let body_to_clothing = input.clothing_pose.inv_mul(input.body_pose);
    let positions = input.body.positions();
    let normals = input.body.normals();

    Ok(CoverageMask::from_fn(positions.len(), |i| {
        let pt = body_to_clothing * positions[i];
        let normal = body_to_clothing * normals[i];
        vertex_covered_by_proximity(clothing, &pt, &normal, config.proximity_tolerance)
    }))
}
