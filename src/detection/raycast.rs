use crate::detection::{CoverageMask, DetectionConfig, DetectionError, DetectionInput};
use crate::math::{Point, Real, Vector};
use crate::pipeline::ProgressSink;
use crate::query::{Ray, RayCast};
use crate::shape::TriMesh;

/// Body vertex counts above which raycast detection reports intermediate
/// progress.
pub(super) const PROGRESS_VERTEX_THRESHOLD: usize = 5000;

/// How many vertices are processed between two progress reports.
const PROGRESS_CHUNK: usize = 1024;

/// Whether a body vertex (expressed in clothing-local space) is covered by
/// the clothing mesh, by casting a ray outward along its normal.
pub(super) fn vertex_covered_by_raycast(
    clothing: &TriMesh,
    pt: &Point<Real>,
    normal: &Vector<Real>,
    max_distance: Real,
) -> bool {
    let norm = normal.norm();
    if norm < crate::math::DEFAULT_EPSILON {
        // Degenerate normal: no outward direction to test.
        return false;
    }

    let ray = Ray::new(*pt, *normal / norm);
    clothing.intersects_local_ray(&ray, max_distance)
}

/// Raycast detection: a vertex is hidden iff a ray cast outward along its
/// normal hits the clothing mesh within `raycast_max_distance`.
pub(super) fn detect_raycast(
    input: &DetectionInput,
    config: &DetectionConfig,
    mut progress: Option<&mut (dyn ProgressSink + '_)>,
) -> Result<CoverageMask, DetectionError> {
    let clothing = input.required_clothing(config.method)?;
    input.checked_normals()?;

    let body_to_clothing = input.clothing_pose.inv_mul(input.body_pose);
    let positions = input.body.positions();
    let normals = input.body.normals();
    let report_chunks = positions.len() > PROGRESS_VERTEX_THRESHOLD;

    let mut mask = CoverageMask::new(positions.len());

    for i in 0..positions.len() {
        let pt = body_to_clothing * positions[i];
        let normal = body_to_clothing * normals[i];

        if vertex_covered_by_raycast(clothing, &pt, &normal, config.raycast_max_distance) {
            let _ = mask.hide(i);
        }

        if report_chunks && i % PROGRESS_CHUNK == PROGRESS_CHUNK - 1 {
            if let Some(sink) = progress.as_deref_mut() {
                sink.report(
                    (i + 1) as Real / positions.len() as Real,
                    "raycast detection",
                );
            }
        }
    }

    Ok(mask)
}
