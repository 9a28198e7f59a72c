//! Deterministic passes applied to a coverage mask after raw detection.

use crate::detection::CoverageMask;
use crate::math::{Isometry, Point, Real};
use crate::shape::BodyMesh;

/// The post-processing passes enabled for one clothing piece.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(C)]
pub struct PostProcessFlags(u8);

bitflags::bitflags! {
    impl PostProcessFlags: u8 {
        /// If set, the coverage is reflected across the body's local YZ plane.
        const MIRROR_SYMMETRY = 1;
        /// If set, the coverage is shrunk away from visible geometry.
        const SAFETY_MARGIN = 1 << 1;
    }
}

/// Per-piece post-processing configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PostProcessConfig {
    /// The enabled passes.
    pub flags: PostProcessFlags,
    /// Minimum world-space distance kept between hidden and visible
    /// geometry by the safety-margin pass.
    pub safety_margin: Real,
    /// Positional tolerance of the symmetry pass, in local units.
    pub mirror_epsilon: Real,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        PostProcessConfig {
            flags: PostProcessFlags::empty(),
            safety_margin: 0.0,
            mirror_epsilon: 1.0e-3,
        }
    }
}

/// Applies the enabled post-processing passes in order: symmetry mirroring,
/// then safety-margin erosion.
pub fn apply_post_processing(
    body: &BodyMesh,
    body_pose: &Isometry<Real>,
    mask: &CoverageMask,
    config: &PostProcessConfig,
) -> CoverageMask {
    let mut result = mask.clone();

    if config.flags.contains(PostProcessFlags::MIRROR_SYMMETRY) {
        result = mirror_symmetry(body, &result, config.mirror_epsilon);
    }

    if config.flags.contains(PostProcessFlags::SAFETY_MARGIN) && config.safety_margin > 0.0 {
        result = shrink_safety_margin(body, body_pose, &result, config.safety_margin);
    }

    result
}

/// Reflects the coverage across the body's local YZ plane: for every hidden
/// vertex at `(x, y, z)`, the body vertex nearest to `(-x, y, z)` within
/// `epsilon` is hidden too.
///
/// This is a nearest-neighbor search across all body vertices per hidden
/// vertex, O(hidden × vertices) — one of the hot paths of a build.
///
/// Idempotent: mirroring an already-mirrored mask does not grow it further.
pub fn mirror_symmetry(body: &BodyMesh, mask: &CoverageMask, epsilon: Real) -> CoverageMask {
    let positions = body.positions();
    let eps2 = epsilon * epsilon;
    let mut result = mask.clone();

    for i in mask.iter_hidden() {
        let p = positions[i];
        let mirrored = Point::new(-p.x, p.y, p.z);

        let mut best: Option<usize> = None;
        let mut best_dist2 = eps2;
        for (j, q) in positions.iter().enumerate() {
            let dist2 = na::distance_squared(q, &mirrored);
            if dist2 <= best_dist2 {
                best_dist2 = dist2;
                best = Some(j);
            }
        }

        if let Some(j) = best {
            let _ = result.hide(j);
        }
    }

    result
}

/// Un-hides every hidden vertex that lies within `margin` (world units) of a
/// vertex left visible by `mask`, guaranteeing a minimum buffer between the
/// discard boundary and visible geometry.
///
/// The visible set is the one of the *input* mask: vertices un-hidden by
/// this pass do not cascade into further erosion. The result is always a
/// subset of the input mask.
pub fn shrink_safety_margin(
    body: &BodyMesh,
    body_pose: &Isometry<Real>,
    mask: &CoverageMask,
    margin: Real,
) -> CoverageMask {
    // Transform to world space once; the margin is a world-space distance.
    let world: Vec<Point<Real>> = body.positions().iter().map(|p| body_pose * p).collect();
    let margin2 = margin * margin;
    let mut result = mask.clone();

    for i in mask.iter_hidden() {
        let near_visible = world.iter().enumerate().any(|(j, q)| {
            !mask.is_hidden(j) && na::distance_squared(&world[i], q) <= margin2
        });

        if near_visible {
            let _ = result.unhide(i);
        }
    }

    result
}
