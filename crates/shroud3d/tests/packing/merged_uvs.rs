use approx::assert_relative_eq;
use shroud3d::detection::CoverageMask;
use shroud3d::packing::{write_tile_uvs, MergeError, OverlapRegion, Tile};
use shroud3d::utils::SortedPair;

use crate::common::strip_body;

fn tile(row: u8, col: u8) -> Tile {
    Tile::new(row, col).unwrap()
}

#[test]
fn uvs_are_offset_by_the_owning_tile() {
    let body = strip_body(4, 0.1);
    let piece0 = CoverageMask::from_fn(4, |i| i == 0 || i == 1);
    let piece1 = CoverageMask::from_fn(4, |i| i == 1 || i == 2);
    let regions = vec![OverlapRegion {
        pieces: SortedPair::new(0, 1),
        shared_count: 1,
        tile: Some(tile(1, 2)),
    }];

    let source = body.uv_channel(0).unwrap().to_vec();
    let uvs = write_tile_uvs(
        &body,
        0,
        &[(0, &piece0, tile(1, 0)), (1, &piece1, tile(1, 1))],
        &regions,
    )
    .unwrap();

    // Vertex 0: only piece 0 → tile (1, 0) → offset (0, 1).
    assert_relative_eq!(uvs[0].x, source[0].x);
    assert_relative_eq!(uvs[0].y, source[0].y + 1.0);
    // Vertex 1: both pieces → overlap tile (1, 2) → offset (2, 1).
    assert_relative_eq!(uvs[1].x, source[1].x + 2.0);
    assert_relative_eq!(uvs[1].y, source[1].y + 1.0);
    // Vertex 2: only piece 1 → tile (1, 1) → offset (1, 1).
    assert_relative_eq!(uvs[2].x, source[2].x + 1.0);
    assert_relative_eq!(uvs[2].y, source[2].y + 1.0);
    // Vertex 3: uncovered → untouched.
    assert_relative_eq!(uvs[3].x, source[3].x);
    assert_relative_eq!(uvs[3].y, source[3].y);
}

#[test]
fn overlapping_vertices_without_a_region_fall_back_to_the_first_owner() {
    let body = strip_body(2, 0.1);
    let piece0 = CoverageMask::from_fn(2, |i| i == 0);
    let piece1 = CoverageMask::from_fn(2, |i| i == 0);

    let source = body.uv_channel(0).unwrap().to_vec();
    let uvs = write_tile_uvs(
        &body,
        0,
        &[(0, &piece0, tile(1, 0)), (1, &piece1, tile(1, 1))],
        &[],
    )
    .unwrap();

    // No region covers the pair: vertex 0 uses piece 0's tile.
    assert_relative_eq!(uvs[0].x, source[0].x);
    assert_relative_eq!(uvs[0].y, source[0].y + 1.0);
}

#[test]
fn triple_overlaps_resolve_through_the_first_two_owners() {
    let body = strip_body(1, 0.1);
    let mask = CoverageMask::from_fn(1, |_| true);
    let regions = vec![
        OverlapRegion {
            pieces: SortedPair::new(0, 1),
            shared_count: 1,
            tile: Some(tile(2, 0)),
        },
        OverlapRegion {
            pieces: SortedPair::new(1, 2),
            shared_count: 1,
            tile: Some(tile(2, 1)),
        },
    ];

    let uvs = write_tile_uvs(
        &body,
        0,
        &[
            (0, &mask, tile(1, 0)),
            (1, &mask, tile(1, 1)),
            (2, &mask, tile(1, 2)),
        ],
        &regions,
    )
    .unwrap();

    // Three owners, but the (0, 1) region wins.
    let source = body.uv_channel(0).unwrap();
    assert_relative_eq!(uvs[0].x, source[0].x);
    assert_relative_eq!(uvs[0].y, source[0].y + 2.0);
}

#[test]
fn missing_source_channel_is_a_structured_failure() {
    let body = strip_body(4, 0.1);
    let mask = CoverageMask::from_fn(4, |i| i == 0);

    let err = write_tile_uvs(&body, 7, &[(0, &mask, tile(1, 0))], &[]).unwrap_err();
    assert!(matches!(err, MergeError::BadSourceChannel { channel: 7, .. }));
}
