use shroud3d::detection::{DetectionCache, DetectionConfig, DetectionMethod};
use shroud3d::math::{Isometry, Real};
use shroud3d::packing::Tile;
use shroud3d::pipeline::{
    process_group, ApplyMode, ClothingPiece, MergeConfig, PieceConfig, PieceOutcome,
};

use crate::common::{grid_body, quad_clothing, strip_body};

fn proximity_config() -> PieceConfig {
    PieceConfig {
        detection: DetectionConfig {
            method: DetectionMethod::Proximity,
            proximity_tolerance: 0.01,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn two_overlapping_pieces_end_to_end() {
    let body = strip_body(100, 0.1);
    // Covers vertices 0..=49 and 25..=74 respectively, 5mm above the skin.
    let front = quad_clothing(-0.05, 4.95, -0.5, 0.5, 0.005);
    let back = quad_clothing(2.45, 7.45, -0.5, 0.5, 0.005);
    let config = proximity_config();

    let pieces = [
        ClothingPiece {
            clothing: Some(&front),
            clothing_pose: Isometry::identity(),
            mask_texture: None,
            config: &config,
        },
        ClothingPiece {
            clothing: Some(&back),
            clothing_pose: Isometry::identity(),
            mask_texture: None,
            config: &config,
        },
    ];

    let mut cache = DetectionCache::new();
    let report = process_group(
        &body,
        &Isometry::identity(),
        &pieces,
        &MergeConfig::default(),
        &mut cache,
        None,
    );

    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.summaries[0].hidden_count, 50);
    assert_eq!(report.summaries[1].hidden_count, 50);
    assert_eq!(
        report.summaries[0].outcome,
        PieceOutcome::Applied(Tile::new(1, 0).unwrap())
    );
    assert_eq!(
        report.summaries[1].outcome,
        PieceOutcome::Applied(Tile::new(1, 1).unwrap())
    );

    assert_eq!(report.regions.len(), 1);
    assert_eq!(report.regions[0].shared_count, 25);
    assert_eq!(report.regions[0].tile, Tile::new(1, 2));

    // The merged mesh carries the new channel; the input mesh is untouched.
    let mesh = report.mesh.as_ref().unwrap();
    assert_eq!(body.num_uv_channels(), 1);
    assert_eq!(mesh.num_uv_channels(), 2);

    let source = body.uv_channel(0).unwrap();
    let merged = mesh.uv_channel(1).unwrap();
    // Vertex 10 is covered by the first piece only: offset (0, 1).
    assert_eq!(merged[10].y, source[10].y + 1.0);
    assert_eq!(merged[10].x, source[10].x);
    // Vertex 30 is covered by both: overlap tile (1, 2), offset (2, 1).
    assert_eq!(merged[30].x, source[30].x + 2.0);
    // Vertex 99 is uncovered.
    assert_eq!(merged[99], source[99]);
}

#[test]
fn detection_failures_exclude_only_the_failing_piece() {
    let body = strip_body(100, 0.1);
    let quad = quad_clothing(-0.05, 4.95, -0.5, 0.5, 0.005);
    let config = proximity_config();

    let pieces = [
        // No clothing mesh: this piece fails.
        ClothingPiece {
            clothing: None,
            clothing_pose: Isometry::identity(),
            mask_texture: None,
            config: &config,
        },
        ClothingPiece {
            clothing: Some(&quad),
            clothing_pose: Isometry::identity(),
            mask_texture: None,
            config: &config,
        },
    ];

    let mut cache = DetectionCache::new();
    let report = process_group(
        &body,
        &Isometry::identity(),
        &pieces,
        &MergeConfig::default(),
        &mut cache,
        None,
    );

    assert!(matches!(
        report.summaries[0].outcome,
        PieceOutcome::Failed(_)
    ));
    // The healthy piece still gets the first auto tile.
    assert_eq!(
        report.summaries[1].outcome,
        PieceOutcome::Applied(Tile::new(1, 0).unwrap())
    );
    assert_eq!(report.degraded_pieces().count(), 1);
}

#[test]
fn zero_coverage_is_reported_not_failed() {
    let body = strip_body(100, 0.1);
    // Far away from the body.
    let quad = quad_clothing(-0.05, 4.95, -0.5, 0.5, 50.0);
    let config = proximity_config();

    let pieces = [ClothingPiece {
        clothing: Some(&quad),
        clothing_pose: Isometry::identity(),
        mask_texture: None,
        config: &config,
    }];

    let mut cache = DetectionCache::new();
    let report = process_group(
        &body,
        &Isometry::identity(),
        &pieces,
        &MergeConfig::default(),
        &mut cache,
        None,
    );

    assert_eq!(report.summaries[0].outcome, PieceOutcome::NoCoverage);
    assert_eq!(report.summaries[0].hidden_count, 0);
    // Nothing applied: no derived mesh.
    assert!(report.mesh.is_none());
}

#[test]
fn deletion_mode_removes_fully_hidden_triangles() {
    // 3×3 vertices, 8 triangles; the quad covers the two left columns.
    let body = grid_body(3, 3, 0.1);
    let quad = quad_clothing(-0.05, 0.15, -0.05, 0.25, 0.005);
    let config = PieceConfig {
        detection: DetectionConfig {
            method: DetectionMethod::Proximity,
            proximity_tolerance: 0.01,
            ..Default::default()
        },
        apply_mode: ApplyMode::DeleteVertices,
        ..Default::default()
    };

    let pieces = [ClothingPiece {
        clothing: Some(&quad),
        clothing_pose: Isometry::identity(),
        mask_texture: None,
        config: &config,
    }];

    let mut cache = DetectionCache::new();
    let report = process_group(
        &body,
        &Isometry::identity(),
        &pieces,
        &MergeConfig::default(),
        &mut cache,
        None,
    );

    assert_eq!(report.summaries[0].outcome, PieceOutcome::AppliedDeletion);
    assert_eq!(report.summaries[0].hidden_count, 6);

    let mesh = report.mesh.as_ref().unwrap();
    // The 4 triangles of the left cell column are gone, the rest stay.
    assert_eq!(body.indices().len(), 8);
    assert_eq!(mesh.indices().len(), 4);
}

#[test]
fn progress_is_reported_in_order() {
    let body = strip_body(100, 0.1);
    let quad = quad_clothing(-0.05, 4.95, -0.5, 0.5, 0.005);
    let config = proximity_config();

    let pieces = [ClothingPiece {
        clothing: Some(&quad),
        clothing_pose: Isometry::identity(),
        mask_texture: None,
        config: &config,
    }];

    let mut fractions: Vec<Real> = Vec::new();
    let mut sink = |fraction: Real, _message: &str| fractions.push(fraction);

    let mut cache = DetectionCache::new();
    let _ = process_group(
        &body,
        &Isometry::identity(),
        &pieces,
        &MergeConfig::default(),
        &mut cache,
        Some(&mut sink as &mut dyn shroud3d::pipeline::ProgressSink),
    );

    assert!(!fractions.is_empty());
    assert_eq!(*fractions.last().unwrap(), 1.0);
}
