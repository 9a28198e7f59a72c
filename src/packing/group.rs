use crate::detection::CoverageMask;
use crate::math::Real;
use crate::packing::overlap::COVERAGE_REDUNDANCY_RATIO;
use crate::packing::{OverlapRegion, PieceId, Tile, TileGrid};
use crate::utils::SortedPair;

/// The coverage result of one clothing piece, ready for tile allocation.
#[derive(Clone, Debug)]
pub struct PieceCoverage {
    /// The piece's post-processed coverage mask.
    pub mask: CoverageMask,
    /// A manually requested tile, if any.
    pub tile_request: Option<Tile>,
    /// Whether this piece opted into overlap-tile optimization.
    pub optimize_overlaps: bool,
    /// Whether this piece has a toggle/activation control. Pieces without
    /// one are candidates for the coverage-redundancy skip.
    pub has_toggle: bool,
}

/// How tile allocation ended for one piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum TileOutcome {
    /// The piece owns this tile.
    Assigned(Tile),
    /// The grid was exhausted; the piece is excluded from the UV remap.
    Skipped,
}

impl TileOutcome {
    /// The assigned tile, if any.
    pub fn tile(&self) -> Option<Tile> {
        match self {
            TileOutcome::Assigned(tile) => Some(*tile),
            TileOutcome::Skipped => None,
        }
    }
}

/// A manual tile request that could not be honored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TileConflict {
    /// The piece whose request conflicted.
    pub piece: PieceId,
    /// The tile it requested.
    pub requested: Tile,
}

/// All the tile-allocation state of one body mesh: its clothing pieces,
/// their masks, the tile grid and the overlap regions.
///
/// One group is constructed per body mesh per build and discarded after;
/// groups share no state, so distinct body meshes are fully independent.
/// Within a group, allocation is strictly sequential.
#[derive(Clone, Debug, Default)]
pub struct BodyMeshGroup {
    pieces: Vec<PieceCoverage>,
    grid: TileGrid,
    outcomes: Vec<TileOutcome>,
    regions: Vec<OverlapRegion>,
    conflicts: Vec<TileConflict>,
}

impl BodyMeshGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a piece to this group, returning its id.
    pub fn push_piece(&mut self, coverage: PieceCoverage) -> PieceId {
        self.pieces.push(coverage);
        (self.pieces.len() - 1) as PieceId
    }

    /// The pieces of this group, in id order.
    pub fn pieces(&self) -> &[PieceCoverage] {
        &self.pieces
    }

    /// The tile outcome of each piece, in id order.
    ///
    /// Empty until [`BodyMeshGroup::allocate_tiles`] ran.
    pub fn outcomes(&self) -> &[TileOutcome] {
        &self.outcomes
    }

    /// The overlap regions of this group, in creation order.
    ///
    /// Empty until [`BodyMeshGroup::allocate_tiles`] ran.
    pub fn regions(&self) -> &[OverlapRegion] {
        &self.regions
    }

    /// The manual tile requests that fell back to automatic allocation.
    pub fn conflicts(&self) -> &[TileConflict] {
        &self.conflicts
    }

    /// The tile grid of this group.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Runs the full allocation: individual tiles first, then overlap
    /// resolution and overlap tiles from the same continuing scan cursor.
    ///
    /// Exhaustion never fails the group: pieces and regions that could not
    /// get a tile are marked skipped and processing continues.
    pub fn allocate_tiles(&mut self) {
        self.allocate_individual_tiles();
        self.resolve_overlaps();
    }

    fn allocate_individual_tiles(&mut self) {
        self.outcomes = vec![TileOutcome::Skipped; self.pieces.len()];

        // When any piece opted into overlap optimization, the largest
        // coverage gets the earliest tile; that choice decides who gets
        // skipped once the grid runs out.
        let mut order: Vec<usize> = (0..self.pieces.len()).collect();
        if self.pieces.iter().any(|p| p.optimize_overlaps) {
            order.sort_by_key(|i| std::cmp::Reverse(self.pieces[*i].mask.hidden_count()));
        }

        for piece_id in order {
            let piece = &self.pieces[piece_id];

            if let Some(requested) = piece.tile_request {
                if self.grid.reserve(requested).is_ok() {
                    self.outcomes[piece_id] = TileOutcome::Assigned(requested);
                    continue;
                }

                log::warn!(
                    "piece {piece_id} requested the occupied tile ({}, {}); falling back to automatic allocation.",
                    requested.row,
                    requested.col,
                );
                self.conflicts.push(TileConflict {
                    piece: piece_id as PieceId,
                    requested,
                });
            }

            match self.grid.allocate_auto() {
                Ok(tile) => self.outcomes[piece_id] = TileOutcome::Assigned(tile),
                Err(_) => {
                    log::warn!("discard-tile grid exhausted: piece {piece_id} skipped.");
                    self.outcomes[piece_id] = TileOutcome::Skipped;
                }
            }
        }
    }

    /// Detects actual vertex-level overlaps between pairs of pieces and
    /// allocates a dedicated tile per accepted pair.
    ///
    /// Pairs are visited in ascending `(i, j)` order over the piece list, so
    /// overlap-tile allocation order is deterministic and independent of
    /// coverage size.
    fn resolve_overlaps(&mut self) {
        for i in 0..self.pieces.len() {
            for j in i + 1..self.pieces.len() {
                // A piece without a tile is excluded from the UV remap, so
                // an overlap tile with it would never be referenced.
                if self.outcomes[i].tile().is_none() || self.outcomes[j].tile().is_none() {
                    continue;
                }

                let shared = self.pieces[i].mask.shared_count(&self.pieces[j].mask);
                if shared == 0 {
                    continue;
                }

                if self.is_redundant_pair(i, j, shared) {
                    continue;
                }

                let tile = match self.grid.allocate_auto() {
                    Ok(tile) => Some(tile),
                    Err(_) => {
                        log::warn!(
                            "discard-tile grid exhausted: overlap region ({i}, {j}) skipped."
                        );
                        None
                    }
                };

                self.regions.push(OverlapRegion {
                    pieces: SortedPair::new(i as PieceId, j as PieceId),
                    shared_count: shared,
                    tile,
                });
            }
        }
    }

    /// The coverage-redundancy heuristic: when the optimization flag is set
    /// on either piece of the pair, a side with no toggle whose coverage is
    /// almost entirely shared is treated as subsumed by the other piece and
    /// the pair gets no overlap tile.
    fn is_redundant_pair(&self, i: usize, j: usize, shared: usize) -> bool {
        if !self.pieces[i].optimize_overlaps && !self.pieces[j].optimize_overlaps {
            return false;
        }

        [i, j].iter().any(|k| {
            let piece = &self.pieces[*k];
            let total = piece.mask.hidden_count();
            !piece.has_toggle
                && total > 0
                && shared as Real / total as Real >= COVERAGE_REDUNDANCY_RATIO
        })
    }
}
