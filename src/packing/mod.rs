//! Packing of coverage results into the 4×4 grid of UDIM discard tiles.

pub use self::group::{BodyMeshGroup, PieceCoverage, TileConflict, TileOutcome};
pub use self::overlap::OverlapRegion;
pub use self::tile::{Tile, TileGrid, TileLimitExceeded, GRID_DIM, NUM_TILES};
pub use self::uv_writer::{write_tile_uvs, MergeError};

mod group;
mod overlap;
mod tile;
mod uv_writer;

/// Identifies one clothing piece within a body-mesh group.
///
/// Piece ids are the insertion order of the pieces into their group; they
/// stay stable for the whole build.
pub type PieceId = u32;
