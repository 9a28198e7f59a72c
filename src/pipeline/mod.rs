//! The per-body-mesh build pipeline: cached detection, post-processing,
//! overlap resolution, tile allocation, merged UV write.

use crate::detection::{
    apply_post_processing, detect, CacheKey, CoverageMask, DetectionCache, DetectionConfig,
    DetectionError, DetectionInput, MaskTexture, PostProcessConfig,
};
use crate::math::{Isometry, Real};
use crate::packing::{
    write_tile_uvs, BodyMeshGroup, MergeError, OverlapRegion, PieceCoverage, PieceId, Tile,
    TileConflict, TileOutcome,
};
use crate::shape::{BodyMesh, TriMesh};
use crate::utils::SortedPair;

/// Receives progress notifications at piece-detection boundaries and major
/// phase transitions.
///
/// `fraction` is in `[0, 1]`. Long-running detection additionally reports
/// intermediate fractions of its own vertex loop. Detection is never
/// cancelled mid-piece; the sink only observes.
pub trait ProgressSink {
    /// Reports the current progress.
    fn report(&mut self, fraction: Real, message: &str);
}

impl<F: FnMut(Real, &str)> ProgressSink for F {
    fn report(&mut self, fraction: Real, message: &str) {
        self(fraction, message)
    }
}

/// How a piece's coverage is applied to the output mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum ApplyMode {
    /// Move covered vertices into a discard tile on the merge UV channel.
    #[default]
    UvDiscard,
    /// Physically remove the triangles whose three corners are covered.
    ///
    /// Used when the downstream material cannot do UV discarding; such a
    /// piece takes part in detection but not in tile allocation.
    DeleteVertices,
}

/// Build-time configuration of one clothing piece.
#[derive(Clone, Debug, Default)]
pub struct PieceConfig {
    /// Detection method and tolerances.
    pub detection: DetectionConfig,
    /// Post-processing passes.
    pub postprocess: PostProcessConfig,
    /// How the coverage is applied to the output mesh.
    pub apply_mode: ApplyMode,
    /// A manually requested discard tile.
    pub tile_request: Option<Tile>,
    /// Opted into overlap-tile optimization.
    pub optimize_overlaps: bool,
    /// Whether the piece has a toggle/activation control.
    pub has_toggle: bool,
}

/// One clothing piece: its geometry and its configuration.
///
/// Pieces are created from build-time component data, consumed once per
/// build, and discarded after.
#[derive(Copy, Clone)]
pub struct ClothingPiece<'a> {
    /// The clothing mesh, for the detection methods that need one.
    pub clothing: Option<&'a TriMesh>,
    /// The local-to-world pose of the clothing mesh.
    pub clothing_pose: Isometry<Real>,
    /// The mask texture, for manual detection.
    pub mask_texture: Option<&'a MaskTexture>,
    /// The piece configuration.
    pub config: &'a PieceConfig,
}

/// Group-level merge configuration.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MergeConfig {
    /// The UV channel providing the original texture-space coordinates.
    pub source_uv_channel: usize,
    /// The UV channel receiving the tile-offset coordinates.
    pub target_uv_channel: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            source_uv_channel: 0,
            target_uv_channel: 1,
        }
    }
}

/// The final state of one piece after a build.
#[derive(Clone, Debug, PartialEq)]
pub enum PieceOutcome {
    /// Covered vertices were moved into this discard tile.
    Applied(Tile),
    /// Covered triangles were removed from the output mesh.
    AppliedDeletion,
    /// Detection succeeded but found zero hidden vertices. Not an error;
    /// the piece simply has no effect on the output.
    NoCoverage,
    /// The discard-tile grid was exhausted before this piece got a tile.
    Skipped,
    /// Detection failed; the piece was excluded from all later phases.
    Failed(DetectionError),
}

/// Per-piece build summary reported to the host build system.
#[derive(Clone, Debug, PartialEq)]
pub struct PieceSummary {
    /// The piece, identified by its index in the input slice.
    pub piece: PieceId,
    /// Number of vertices hidden by this piece after post-processing.
    pub hidden_count: usize,
    /// The apply mode the piece was configured with.
    pub mode: ApplyMode,
    /// What happened to the piece.
    pub outcome: PieceOutcome,
}

/// The result of processing one body-mesh group.
#[derive(Clone, Debug, Default)]
pub struct GroupReport {
    /// The derived mesh, or `None` if no piece had any effect.
    ///
    /// The input body mesh is never mutated.
    pub mesh: Option<BodyMesh>,
    /// One summary per input piece, in input order.
    pub summaries: Vec<PieceSummary>,
    /// The overlap regions, with piece ids referring to the input slice.
    pub regions: Vec<OverlapRegion>,
    /// Manual tile requests that fell back to automatic allocation.
    pub conflicts: Vec<TileConflict>,
    /// Why the merged UV channel could not be produced, if it could not.
    ///
    /// Triangle deletion still applies when this is set; only the UV-discard
    /// path of the group is aborted.
    pub merge_error: Option<MergeError>,
}

impl GroupReport {
    /// The pieces that were skipped or failed, for surfacing warnings.
    pub fn degraded_pieces(&self) -> impl Iterator<Item = &PieceSummary> {
        self.summaries
            .iter()
            .filter(|s| matches!(s.outcome, PieceOutcome::Skipped | PieceOutcome::Failed(_)))
    }
}

/// Runs the full pipeline for one body mesh and all clothing pieces
/// targeting it.
///
/// Per-piece failures never abort the group: the failing piece is excluded
/// and every remaining piece processes normally. The result is always a
/// structured report; nothing is silently dropped.
pub fn process_group(
    body: &BodyMesh,
    body_pose: &Isometry<Real>,
    pieces: &[ClothingPiece],
    merge: &MergeConfig,
    cache: &mut DetectionCache,
    mut progress: Option<&mut dyn ProgressSink>,
) -> GroupReport {
    let mut report = GroupReport::default();

    // Detection, per piece, cached.
    let mut masks: Vec<Option<CoverageMask>> = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.iter().enumerate() {
        if let Some(sink) = progress.as_deref_mut() {
            sink.report(
                0.7 * i as Real / pieces.len().max(1) as Real,
                "detecting hidden vertices",
            );
        }

        match detect_piece(body, body_pose, piece, cache, progress.as_deref_mut()) {
            Ok(mask) => {
                let mask = apply_post_processing(body, body_pose, &mask, &piece.config.postprocess);
                masks.push(Some(mask));
            }
            Err(err) => {
                log::warn!("detection of piece {i} failed: {err}");
                report.summaries.push(PieceSummary {
                    piece: i as PieceId,
                    hidden_count: 0,
                    mode: piece.config.apply_mode,
                    outcome: PieceOutcome::Failed(err),
                });
                masks.push(None);
            }
        }
    }

    if let Some(sink) = progress.as_deref_mut() {
        sink.report(0.7, "merging coverage");
    }

    // Tile allocation for the UV-discard pieces with nonzero coverage.
    let mut group = BodyMeshGroup::new();
    let mut group_to_input: Vec<usize> = Vec::new();
    for (i, piece) in pieces.iter().enumerate() {
        let Some(mask) = &masks[i] else { continue };

        if piece.config.apply_mode != ApplyMode::UvDiscard || mask.hidden_count() == 0 {
            continue;
        }

        let _ = group.push_piece(PieceCoverage {
            mask: mask.clone(),
            tile_request: piece.config.tile_request,
            optimize_overlaps: piece.config.optimize_overlaps,
            has_toggle: piece.config.has_toggle,
        });
        group_to_input.push(i);
    }
    group.allocate_tiles();

    // Report regions and conflicts with input-slice piece ids. The group is
    // built in input order, so the monotonic remap keeps pairs sorted.
    report.regions = group
        .regions()
        .iter()
        .map(|r| OverlapRegion {
            pieces: SortedPair::new(
                group_to_input[r.pieces.0 as usize] as PieceId,
                group_to_input[r.pieces.1 as usize] as PieceId,
            ),
            shared_count: r.shared_count,
            tile: r.tile,
        })
        .collect();
    report.conflicts = group
        .conflicts()
        .iter()
        .map(|c| TileConflict {
            piece: group_to_input[c.piece as usize] as PieceId,
            requested: c.requested,
        })
        .collect();

    // Merged UV write, one pass over all vertices.
    let assigned: Vec<(PieceId, &CoverageMask, Tile)> = group
        .outcomes()
        .iter()
        .enumerate()
        .filter_map(|(g, outcome)| {
            outcome
                .tile()
                .map(|tile| (group_to_input[g] as PieceId, &group.pieces()[g].mask, tile))
        })
        .collect();

    let mut result_mesh: Option<BodyMesh> = None;

    // Triangle deletion for the deletion-mode pieces.
    let mut deleted = vec![false; body.num_vertices()];
    let mut any_deletion = false;
    for (i, piece) in pieces.iter().enumerate() {
        if piece.config.apply_mode == ApplyMode::DeleteVertices {
            if let Some(mask) = &masks[i] {
                if mask.hidden_count() > 0 {
                    any_deletion = true;
                    for v in mask.iter_hidden() {
                        deleted[v] = true;
                    }
                }
            }
        }
    }
    if any_deletion {
        result_mesh = Some(body.without_hidden_triangles(&deleted));
    }

    if !assigned.is_empty() {
        let base = result_mesh.as_ref().unwrap_or(body);
        match write_tile_uvs(base, merge.source_uv_channel, &assigned, &report.regions) {
            Ok(uvs) => {
                let merged = base.with_uv_channel(merge.target_uv_channel, uvs);
                result_mesh = Some(merged);
            }
            Err(err) => {
                log::warn!("merged UV channel could not be produced: {err}");
                report.merge_error = Some(err);
            }
        }
    }

    // Summaries for the pieces that made it past detection.
    for (i, piece) in pieces.iter().enumerate() {
        let Some(mask) = &masks[i] else { continue };

        let outcome = if mask.hidden_count() == 0 {
            PieceOutcome::NoCoverage
        } else {
            match piece.config.apply_mode {
                ApplyMode::DeleteVertices => PieceOutcome::AppliedDeletion,
                ApplyMode::UvDiscard => {
                    let group_id = group_to_input.iter().position(|k| *k == i);
                    match group_id.map(|g| group.outcomes()[g]) {
                        Some(TileOutcome::Assigned(tile)) if report.merge_error.is_none() => {
                            PieceOutcome::Applied(tile)
                        }
                        _ => PieceOutcome::Skipped,
                    }
                }
            }
        };

        report.summaries.push(PieceSummary {
            piece: i as PieceId,
            hidden_count: mask.hidden_count(),
            mode: piece.config.apply_mode,
            outcome,
        });
    }
    report.summaries.sort_by_key(|s| s.piece);

    report.mesh = result_mesh;

    if let Some(sink) = progress.as_deref_mut() {
        sink.report(1.0, "group processed");
    }

    report
}

fn detect_piece(
    body: &BodyMesh,
    body_pose: &Isometry<Real>,
    piece: &ClothingPiece,
    cache: &mut DetectionCache,
    progress: Option<&mut (dyn ProgressSink + '_)>,
) -> Result<CoverageMask, DetectionError> {
    let input = DetectionInput {
        body,
        body_pose,
        clothing: piece.clothing,
        clothing_pose: &piece.clothing_pose,
        mask_texture: piece.mask_texture,
    };
    let key = CacheKey::build(&input, &piece.config.detection);
    cache.get_or_compute(key, move || detect(&input, &piece.config.detection, progress))
}

/// Convenience wrapper around [`detect`] + [`apply_post_processing`] for a
/// single piece, without caching or packing.
pub fn detect_single_piece(
    body: &BodyMesh,
    body_pose: &Isometry<Real>,
    piece: &ClothingPiece,
    progress: Option<&mut dyn ProgressSink>,
) -> Result<CoverageMask, DetectionError> {
    let input = DetectionInput {
        body,
        body_pose,
        clothing: piece.clothing,
        clothing_pose: &piece.clothing_pose,
        mask_texture: piece.mask_texture,
    };
    let raw = detect(&input, &piece.config.detection, progress)?;
    Ok(apply_post_processing(
        body,
        body_pose,
        &raw,
        &piece.config.postprocess,
    ))
}
