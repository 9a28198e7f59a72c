use shroud3d::detection::{
    detect, DetectionConfig, DetectionError, DetectionInput, DetectionMethod, MaskTexture,
};
use shroud3d::math::Isometry;
use shroud3d::shape::BodyMesh;

use crate::common::{quad_clothing, strip_body};

fn detect_on_strip(
    body: &BodyMesh,
    clothing: Option<&shroud3d::shape::TriMesh>,
    texture: Option<&MaskTexture>,
    config: &DetectionConfig,
) -> Result<shroud3d::detection::CoverageMask, DetectionError> {
    let identity = Isometry::identity();
    let input = DetectionInput {
        body,
        body_pose: &identity,
        clothing,
        clothing_pose: &identity,
        mask_texture: texture,
    };
    detect(&input, config, None)
}

/// 100 vertices spaced 0.1 apart; the quad hovers 5mm above the first 50.
fn half_covered_strip() -> (BodyMesh, shroud3d::shape::TriMesh) {
    let body = strip_body(100, 0.1);
    let clothing = quad_clothing(-0.05, 4.95, -0.5, 0.5, 0.005);
    (body, clothing)
}

#[test]
fn proximity_hides_the_covered_half() {
    let (body, clothing) = half_covered_strip();
    let config = DetectionConfig {
        method: DetectionMethod::Proximity,
        proximity_tolerance: 0.01,
        ..Default::default()
    };

    let mask = detect_on_strip(&body, Some(&clothing), None, &config).unwrap();
    assert_eq!(mask.hidden_count(), 50);
    assert_eq!(mask.hidden_count(), mask.iter_hidden().count());
    assert!(mask.is_hidden(0) && mask.is_hidden(49));
    assert!(!mask.is_hidden(50) && !mask.is_hidden(99));
}

#[test]
fn proximity_rejects_back_facing_clothing() {
    let body = strip_body(100, 0.1);
    // Same quad, but wound so its normal points away from the body normals.
    let flipped = {
        use shroud3d::math::Point;
        shroud3d::shape::TriMesh::new(
            vec![
                Point::new(-0.05, -0.5, 0.005),
                Point::new(4.95, -0.5, 0.005),
                Point::new(4.95, 0.5, 0.005),
                Point::new(-0.05, 0.5, 0.005),
            ],
            vec![[0, 2, 1], [0, 3, 2]],
        )
        .unwrap()
    };
    let config = DetectionConfig {
        method: DetectionMethod::Proximity,
        proximity_tolerance: 0.01,
        ..Default::default()
    };

    let mask = detect_on_strip(&body, Some(&flipped), None, &config).unwrap();
    assert_eq!(mask.hidden_count(), 0);
}

#[test]
fn raycast_hides_the_covered_half() {
    let (body, clothing) = half_covered_strip();
    let config = DetectionConfig {
        method: DetectionMethod::Raycast,
        raycast_max_distance: 0.1,
        ..Default::default()
    };

    let mask = detect_on_strip(&body, Some(&clothing), None, &config).unwrap();
    assert_eq!(mask.hidden_count(), 50);
}

#[test]
fn raycast_respects_max_distance() {
    let body = strip_body(100, 0.1);
    // The quad is out of ray reach.
    let clothing = quad_clothing(-0.05, 4.95, -0.5, 0.5, 0.5);
    let config = DetectionConfig {
        method: DetectionMethod::Raycast,
        raycast_max_distance: 0.1,
        ..Default::default()
    };

    let mask = detect_on_strip(&body, Some(&clothing), None, &config).unwrap();
    assert_eq!(mask.hidden_count(), 0);
}

#[test]
fn hybrid_is_the_union_of_raycast_and_proximity() {
    let (body, clothing) = half_covered_strip();
    let base = DetectionConfig {
        proximity_tolerance: 0.01,
        raycast_max_distance: 0.1,
        ..Default::default()
    };

    let raycast = detect_on_strip(
        &body,
        Some(&clothing),
        None,
        &DetectionConfig {
            method: DetectionMethod::Raycast,
            ..base
        },
    )
    .unwrap();
    let proximity = detect_on_strip(
        &body,
        Some(&clothing),
        None,
        &DetectionConfig {
            method: DetectionMethod::Proximity,
            ..base
        },
    )
    .unwrap();
    let hybrid = detect_on_strip(
        &body,
        Some(&clothing),
        None,
        &DetectionConfig {
            method: DetectionMethod::Hybrid,
            ..base
        },
    )
    .unwrap();

    assert!(raycast.is_subset_of(&hybrid));
    assert!(proximity.is_subset_of(&hybrid));
    for i in hybrid.iter_hidden() {
        assert!(raycast.is_hidden(i) || proximity.is_hidden(i));
    }
}

#[test]
fn smart_finds_the_covered_half_deterministically() {
    let (body, clothing) = half_covered_strip();
    let config = DetectionConfig {
        method: DetectionMethod::Smart,
        proximity_tolerance: 0.01,
        raycast_max_distance: 0.1,
        ..Default::default()
    };

    let first = detect_on_strip(&body, Some(&clothing), None, &config).unwrap();
    let second = detect_on_strip(&body, Some(&clothing), None, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.hidden_count(), 50);
}

#[test]
fn manual_thresholds_the_mask_texture() {
    let body = strip_body(100, 0.1);
    // One texel per vertex: opaque for the first half.
    let values: Vec<f32> = (0..100).map(|i| if i < 50 { 1.0 } else { 0.0 }).collect();
    let texture = MaskTexture::new(100, 1, values).unwrap();
    let config = DetectionConfig {
        method: DetectionMethod::Manual,
        mask_threshold: 0.5,
        ..Default::default()
    };

    let mask = detect_on_strip(&body, None, Some(&texture), &config).unwrap();
    assert_eq!(mask.hidden_count(), 50);
    assert!(mask.is_hidden(49));
    assert!(!mask.is_hidden(50));
}

#[test]
fn missing_clothing_mesh_is_a_structured_failure() {
    let body = strip_body(10, 0.1);
    let config = DetectionConfig {
        method: DetectionMethod::Raycast,
        ..Default::default()
    };

    let err = detect_on_strip(&body, None, None, &config).unwrap_err();
    assert!(matches!(err, DetectionError::MissingReference { .. }));
}

#[test]
fn mismatched_normals_are_a_structured_failure() {
    use shroud3d::math::{Point, Point2};

    // 3 positions but only 1 normal.
    let body = BodyMesh::new(
        vec![Point::origin(), Point::new(1.0, 0.0, 0.0), Point::new(2.0, 0.0, 0.0)],
        vec![shroud3d::math::Vector::z()],
        vec![vec![Point2::origin(); 3]],
        Vec::new(),
    )
    .unwrap();
    let clothing = quad_clothing(0.0, 1.0, -0.5, 0.5, 0.005);
    let config = DetectionConfig {
        method: DetectionMethod::Proximity,
        ..Default::default()
    };

    let err = detect_on_strip(&body, Some(&clothing), None, &config).unwrap_err();
    assert_eq!(
        err,
        DetectionError::GeometryMismatch {
            buffer: "normal",
            expected: 3,
            actual: 1,
        }
    );
}
