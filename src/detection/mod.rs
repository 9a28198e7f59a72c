//! Per-vertex visibility detection: which body vertices are hidden under a
//! clothing mesh.

pub use self::cache::{CacheKey, DetectionCache};
pub use self::config::{DetectionConfig, DetectionMethod};
pub use self::manual::{MaskTexture, MaskTextureError};
pub use self::mask::CoverageMask;
pub use self::postprocess::{
    apply_post_processing, mirror_symmetry, shrink_safety_margin, PostProcessConfig,
    PostProcessFlags,
};

use crate::math::{Isometry, Real};
use crate::pipeline::ProgressSink;
use crate::shape::{BodyMesh, TriMesh};

pub mod cache;
pub mod postprocess;

mod config;
mod manual;
mod mask;
mod proximity;
mod raycast;
mod smart;

/// Indicates why the detection of one clothing piece failed.
///
/// A detection failure only excludes the failing piece; other pieces of the
/// same body mesh keep processing normally.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum DetectionError {
    /// An attribute buffer is inconsistent with the vertex buffer.
    #[error("the {buffer} buffer has {actual} entries but the mesh has {expected} vertices.")]
    GeometryMismatch {
        /// Name of the offending buffer.
        buffer: &'static str,
        /// The expected entry count (the mesh vertex count).
        expected: usize,
        /// The actual entry count.
        actual: usize,
    },
    /// A reference required by the selected detection method is absent.
    #[error("detection method {method:?} requires a {what}, but none was provided.")]
    MissingReference {
        /// The selected detection method.
        method: DetectionMethod,
        /// What was missing.
        what: &'static str,
    },
}

/// The geometry a single detection run operates on.
///
/// All references are read-only: detection never mutates its inputs.
#[derive(Copy, Clone)]
pub struct DetectionInput<'a> {
    /// The mesh whose vertices get classified.
    pub body: &'a BodyMesh,
    /// The local-to-world pose of the body mesh.
    pub body_pose: &'a Isometry<Real>,
    /// The clothing mesh, for the methods that need one.
    pub clothing: Option<&'a TriMesh>,
    /// The local-to-world pose of the clothing mesh.
    pub clothing_pose: &'a Isometry<Real>,
    /// The mask texture, for the manual method.
    pub mask_texture: Option<&'a MaskTexture>,
}

impl<'a> DetectionInput<'a> {
    fn required_clothing(&self, method: DetectionMethod) -> Result<&'a TriMesh, DetectionError> {
        self.clothing.ok_or(DetectionError::MissingReference {
            method,
            what: "clothing mesh",
        })
    }

    fn checked_normals(&self) -> Result<(), DetectionError> {
        if self.body.normals().len() != self.body.num_vertices() {
            return Err(DetectionError::GeometryMismatch {
                buffer: "normal",
                expected: self.body.num_vertices(),
                actual: self.body.normals().len(),
            });
        }
        Ok(())
    }
}

/// Classifies every body vertex as hidden or visible under the configured
/// clothing piece.
///
/// This is the raw detection pass; post-processing (symmetry mirroring,
/// safety-margin erosion) runs separately on the returned mask.
pub fn detect(
    input: &DetectionInput,
    config: &DetectionConfig,
    progress: Option<&mut (dyn ProgressSink + '_)>,
) -> Result<CoverageMask, DetectionError> {
    match config.method {
        DetectionMethod::Manual => manual::detect_manual(input, config),
        DetectionMethod::Proximity => proximity::detect_proximity(input, config),
        DetectionMethod::Raycast => raycast::detect_raycast(input, config, progress),
        DetectionMethod::Hybrid => {
            // Either method marking a vertex hides it, to catch cases one of
            // them misses alone.
            let mut mask = raycast::detect_raycast(input, config, progress)?;
            let near = proximity::detect_proximity(input, config)?;
            for i in near.iter_hidden() {
                let _ = mask.hide(i);
            }
            Ok(mask)
        }
        DetectionMethod::Smart => smart::detect_smart(input, config, progress),
    }
}
