use crate::detection::CoverageMask;
use crate::math::{Point2, Real};
use crate::packing::{OverlapRegion, PieceId, Tile};
use crate::shape::BodyMesh;
use crate::utils::hashmap::HashMap;
use crate::utils::SortedPair;
use smallvec::SmallVec;

/// Indicates why the merged UV channel could not be produced.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeError {
    /// The source UV channel does not exist or has the wrong length.
    #[error("the source UV channel {channel} has {actual} entries but the mesh has {expected} vertices.")]
    BadSourceChannel {
        /// The requested channel.
        channel: usize,
        /// The expected entry count (the mesh vertex count).
        expected: usize,
        /// The actual entry count.
        actual: usize,
    },
}

/// Computes the merged discard UV buffer: one O(V) pass over the body mesh
/// once every tile assignment is final.
///
/// For each vertex, the written UV is the source-channel UV offset by the
/// tile of its owner:
///
/// - covered by zero pieces: left unmodified;
/// - covered by exactly one piece: that piece's tile;
/// - covered by two or more pieces: the tile of the overlap region matching
///   its first two owners, or the first owner's tile if no such region got a
///   tile (degradation logged; vertices covered by three or more pieces
///   always resolve through their first two owners).
///
/// `pieces` must only contain the pieces that did get a tile.
pub fn write_tile_uvs(
    body: &BodyMesh,
    source_channel: usize,
    pieces: &[(PieceId, &CoverageMask, Tile)],
    regions: &[OverlapRegion],
) -> Result<Vec<Point2<Real>>, MergeError> {
    let num_vertices = body.num_vertices();
    let source = body.uv_channel(source_channel).unwrap_or(&[]);
    if source.len() != num_vertices {
        return Err(MergeError::BadSourceChannel {
            channel: source_channel,
            expected: num_vertices,
            actual: source.len(),
        });
    }

    let region_tiles: HashMap<SortedPair<PieceId>, Tile> = regions
        .iter()
        .filter_map(|r| r.tile.map(|tile| (r.pieces, tile)))
        .collect();

    let piece_tiles: HashMap<PieceId, Tile> =
        pieces.iter().map(|(id, _, tile)| (*id, *tile)).collect();

    // Owners per vertex, in piece-id order.
    let mut owners: Vec<SmallVec<[PieceId; 4]>> = vec![SmallVec::new(); num_vertices];
    let mut sorted_pieces: Vec<_> = pieces.iter().collect();
    sorted_pieces.sort_by_key(|(id, _, _)| *id);
    for (id, mask, _) in sorted_pieces {
        for i in mask.iter_hidden() {
            owners[i].push(*id);
        }
    }

    let mut result = source.to_vec();
    for i in 0..num_vertices {
        let tile = match owners[i].as_slice() {
            [] => continue,
            [single] => piece_tiles[single],
            [first, second, rest @ ..] => {
                let pair = SortedPair::new(*first, *second);
                match region_tiles.get(&pair) {
                    Some(tile) => {
                        if !rest.is_empty() {
                            log::debug!(
                                "vertex {i} is covered by {} pieces; using the overlap tile of pieces {first} and {second}.",
                                owners[i].len(),
                            );
                        }
                        *tile
                    }
                    None => {
                        log::debug!(
                            "vertex {i} is covered by pieces {first} and {second} but their pair has no overlap tile; using piece {first}'s tile.",
                        );
                        piece_tiles[first]
                    }
                }
            }
        };

        result[i] += tile.uv_offset();
    }

    Ok(result)
}
