use crate::detection::{CoverageMask, DetectionConfig, DetectionError, DetectionInput};
use crate::math::Real;
use std::hash::Hasher;

/// A single-channel mask texture sampled by the manual detection method.
///
/// Texels are stored row-major starting at the bottom-left corner, matching
/// the UV convention where `(0, 0)` is the bottom-left of the texture.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MaskTexture {
    width: u32,
    height: u32,
    values: Vec<Real>,
}

/// Indicates an inconsistency while building a mask texture.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaskTextureError {
    /// The texel buffer length does not match the texture dimensions.
    #[error("a {width}x{height} mask texture needs {expected} texels, got {actual}.")]
    WrongLength {
        /// The texture width.
        width: u32,
        /// The texture height.
        height: u32,
        /// `width * height`.
        expected: usize,
        /// The actual texel count.
        actual: usize,
    },
}

impl MaskTexture {
    /// Creates a mask texture from its dimensions and texel values.
    pub fn new(width: u32, height: u32, values: Vec<Real>) -> Result<Self, MaskTextureError> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(MaskTextureError::WrongLength {
                width,
                height,
                expected,
                actual: values.len(),
            });
        }

        Ok(MaskTexture {
            width,
            height,
            values,
        })
    }

    /// Samples this texture at the given UV coordinate.
    ///
    /// Nearest-texel sampling with repeat wrapping on both axes. An empty
    /// texture samples to zero everywhere.
    pub fn sample(&self, u: Real, v: Real) -> Real {
        if self.width == 0 || self.height == 0 {
            return 0.0;
        }

        let wrap = |t: Real| t - t.floor();
        let x = ((wrap(u) * self.width as Real) as u32).min(self.width - 1);
        let y = ((wrap(v) * self.height as Real) as u32).min(self.height - 1);
        self.values[(y * self.width + x) as usize]
    }

    /// Feeds the full content of this texture to `h`.
    pub fn write_signature(&self, h: &mut impl Hasher) {
        h.write_u32(self.width);
        h.write_u32(self.height);
        for value in &self.values {
            h.write_u32(value.to_bits());
        }
    }
}

/// Manual detection: a vertex is hidden iff the mask texture sampled at its
/// UV coordinate exceeds the configured threshold.
pub(super) fn detect_manual(
    input: &DetectionInput,
    config: &DetectionConfig,
) -> Result<CoverageMask, DetectionError> {
    let texture = input
        .mask_texture
        .ok_or(DetectionError::MissingReference {
            method: config.method,
            what: "mask texture",
        })?;

    let num_vertices = input.body.num_vertices();
    let uvs = input
        .body
        .uv_channel(config.mask_uv_channel)
        .unwrap_or(&[]);
    if uvs.len() != num_vertices {
        return Err(DetectionError::GeometryMismatch {
            buffer: "uv",
            expected: num_vertices,
            actual: uvs.len(),
        });
    }

    Ok(CoverageMask::from_fn(num_vertices, |i| {
        texture.sample(uvs[i].x, uvs[i].y) > config.mask_threshold
    }))
}
