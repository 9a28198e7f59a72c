//! Content-addressed memoization of detection results.
//!
//! Detection is the expensive part of a build and meshes are rebuilt
//! repeatedly during iterative editing, so results are memoized under a hash
//! of everything that affects them. Stale keys simply stop being looked up;
//! no explicit eviction is needed for a process-lifetime cache.

use crate::detection::{CoverageMask, DetectionConfig, DetectionError, DetectionInput};
use crate::shape::{BodyMesh, TriMesh};
use crate::utils::hashmap::HashMap;
use crate::utils::FxHasher64;
use std::hash::Hasher;

/// The content hash identifying one detection run.
///
/// Two runs get the same key iff their body mesh, clothing mesh, mask
/// texture, relative pose, and full detection configuration are
/// bit-identical.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CacheKey(u64);

impl CacheKey {
    /// Computes the key of a detection run.
    pub fn build(input: &DetectionInput, config: &DetectionConfig) -> CacheKey {
        let mut h = FxHasher64::default();

        write_body_signature(input.body, &mut h);

        match input.clothing {
            Some(clothing) => write_trimesh_signature(clothing, &mut h),
            None => h.write_u8(0),
        }

        if let Some(texture) = input.mask_texture {
            texture.write_signature(&mut h);
        }

        // Only the relative pose affects the output, so hashing it (rather
        // than both poses) lets a rigidly co-moved pair keep its cache entry.
        let relative = input.clothing_pose.inv_mul(input.body_pose);
        for k in relative.translation.vector.iter() {
            h.write_u32(k.to_bits());
        }
        for k in relative.rotation.coords.iter() {
            h.write_u32(k.to_bits());
        }

        config.write_signature(&mut h);

        CacheKey(h.finish())
    }
}

fn write_body_signature(body: &BodyMesh, h: &mut impl Hasher) {
    h.write_usize(body.num_vertices());
    for p in body.positions() {
        for k in p.coords.iter() {
            h.write_u32(k.to_bits());
        }
    }
    for n in body.normals() {
        for k in n.iter() {
            h.write_u32(k.to_bits());
        }
    }
    h.write_usize(body.num_uv_channels());
    for channel in 0..body.num_uv_channels() {
        for uv in body.uv_channel(channel).unwrap_or(&[]) {
            h.write_u32(uv.x.to_bits());
            h.write_u32(uv.y.to_bits());
        }
    }
    for idx in body.indices() {
        for k in idx {
            h.write_u32(*k);
        }
    }
}

fn write_trimesh_signature(mesh: &TriMesh, h: &mut impl Hasher) {
    h.write_usize(mesh.vertices().len());
    for p in mesh.vertices() {
        for k in p.coords.iter() {
            h.write_u32(k.to_bits());
        }
    }
    for idx in mesh.indices() {
        for k in idx {
            h.write_u32(*k);
        }
    }
}

/// A process-lifetime memo of detection results.
#[derive(Clone, Debug, Default)]
pub struct DetectionCache {
    entries: HashMap<CacheKey, CoverageMask>,
}

impl DetectionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of memoized detection results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this cache holds no result.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the memoized mask for `key`, or runs `compute`, memoizes its
    /// result, and returns it.
    ///
    /// A hit returns a bit-identical copy of the originally computed mask.
    /// Failed computations are not memoized: the next lookup for the same
    /// key retries.
    pub fn get_or_compute(
        &mut self,
        key: CacheKey,
        compute: impl FnOnce() -> Result<CoverageMask, DetectionError>,
    ) -> Result<CoverageMask, DetectionError> {
        if let Some(mask) = self.entries.get(&key) {
            return Ok(mask.clone());
        }

        let mask = compute()?;
        let _ = self.entries.insert(key, mask.clone());
        Ok(mask)
    }
}
