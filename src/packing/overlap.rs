use crate::packing::{PieceId, Tile};
use crate::utils::SortedPair;

/// A pair of clothing pieces whose coverage masks intersect, granted its own
/// discard tile so both pieces can toggle independently.
///
/// The identity of a region is the unordered pair of its member pieces:
/// regions created from `(a, b)` and `(b, a)` are the same region.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct OverlapRegion {
    /// The two pieces sharing coverage.
    pub pieces: SortedPair<PieceId>,
    /// The number of vertices hidden by both pieces.
    pub shared_count: usize,
    /// The tile allocated to this region, or `None` if the grid was
    /// exhausted and the region was skipped.
    pub tile: Option<Tile>,
}

/// A piece's share of an overlap large enough to make its own coverage
/// redundant with the other piece's.
pub const COVERAGE_REDUNDANCY_RATIO: f32 = 0.95;
