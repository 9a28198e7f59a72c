use crate::math::Real;
use std::hash::Hasher;

/// The algorithm used to classify body vertices as hidden or visible.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum DetectionMethod {
    /// Sample a mask texture at each vertex's UV coordinate.
    Manual,
    /// Nearest-point search against the clothing mesh within a tolerance.
    Proximity,
    /// Ray cast outward along the vertex normal against the clothing mesh.
    Raycast,
    /// Raycast OR Proximity.
    #[default]
    Hybrid,
    /// Weighted combination of several sub-strategies.
    Smart,
}

/// Per-piece detection configuration.
///
/// Every field of this structure affects the detection output and therefore
/// contributes to the detection-cache key: changing any one field is a cache
/// miss.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DetectionConfig {
    /// The detection algorithm to run.
    pub method: DetectionMethod,
    /// Maximum body-to-clothing distance for the proximity method, in world
    /// units.
    pub proximity_tolerance: Real,
    /// Maximum ray travel distance for the raycast method, in world units.
    pub raycast_max_distance: Real,
    /// A sampled mask value above this threshold hides the vertex (manual
    /// method only).
    pub mask_threshold: Real,
    /// The body UV channel sampled by the manual method.
    pub mask_uv_channel: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            method: DetectionMethod::default(),
            proximity_tolerance: 0.01,
            raycast_max_distance: 0.1,
            mask_threshold: 0.5,
            mask_uv_channel: 0,
        }
    }
}

impl DetectionConfig {
    /// Feeds every output-affecting field of this configuration to `h`.
    ///
    /// Floats are hashed by their exact bit pattern: two configurations hash
    /// alike iff they are bit-identical.
    pub fn write_signature(&self, h: &mut impl Hasher) {
        let discriminant = match self.method {
            DetectionMethod::Manual => 0u8,
            DetectionMethod::Proximity => 1,
            DetectionMethod::Raycast => 2,
            DetectionMethod::Hybrid => 3,
            DetectionMethod::Smart => 4,
        };
        h.write_u8(discriminant);
        h.write_u32(self.proximity_tolerance.to_bits());
        h.write_u32(self.raycast_max_distance.to_bits());
        h.write_u32(self.mask_threshold.to_bits());
        h.write_usize(self.mask_uv_channel);
    }
}
