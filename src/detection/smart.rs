use crate::detection::proximity::vertex_covered_by_proximity;
use crate::detection::raycast::{vertex_covered_by_raycast, PROGRESS_VERTEX_THRESHOLD};
use crate::detection::{CoverageMask, DetectionConfig, DetectionError, DetectionInput};
use crate::math::Real;
use crate::pipeline::ProgressSink;

/// Confidence assigned to a raycast hit.
const RAYCAST_WEIGHT: Real = 0.55;
/// Confidence assigned to a proximity match at the configured tolerance.
const PROXIMITY_WEIGHT: Real = 0.35;
/// Additional confidence when the match also holds at half the tolerance.
const TIGHT_PROXIMITY_WEIGHT: Real = 0.25;
/// Total confidence required to hide a vertex.
const CONFIDENCE_FLOOR: Real = 0.55;

/// Smart detection: several sub-strategies vote with method-specific
/// confidence weights.
///
/// A raycast hit alone clears the floor, and so does a proximity match
/// confirmed at half the tolerance; a loose proximity match alone does not.
/// The vote is deterministic for identical inputs.
pub(super) fn detect_smart(
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

        let mut confidence = 0.0;
        if vertex_covered_by_raycast(clothing, &pt, &normal, config.raycast_max_distance) {
            confidence += RAYCAST_WEIGHT;
        }
        if vertex_covered_by_proximity(clothing, &pt, &normal, config.proximity_tolerance) {
            confidence += PROXIMITY_WEIGHT;
            if vertex_covered_by_proximity(
                clothing,
                &pt,
                &normal,
                config.proximity_tolerance * 0.5,
            ) {
                confidence += TIGHT_PROXIMITY_WEIGHT;
            }
        }

        if confidence >= CONFIDENCE_FLOOR {
            let _ = mask.hide(i);
        }

        if report_chunks && i % 1024 == 1023 {
            if let Some(sink) = progress.as_deref_mut() {
                sink.report((i + 1) as Real / positions.len() as Real, "smart detection");
            }
        }
    }

    Ok(mask)
}
