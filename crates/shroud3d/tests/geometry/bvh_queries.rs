//! The BVH-accelerated mesh queries must agree with brute force over every
//! triangle.

use shroud3d::math::{Point, Real, Vector};
use shroud3d::na;
use shroud3d::query::details::local_ray_intersection_with_triangle;
use shroud3d::query::{PointQuery, Ray, RayCast};
use shroud3d::shape::TriMesh;

fn random_trimesh(seed: u64, num_triangles: usize) -> TriMesh {
    let mut rng = oorandom::Rand32::new(seed);
    let mut coord = move || rng.rand_float() * 2.0 - 1.0;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for k in 0..num_triangles {
        let base = Point::new(coord(), coord(), coord());
        vertices.push(base);
        vertices.push(base + Vector::new(coord() * 0.3, coord() * 0.3, coord() * 0.3));
        vertices.push(base + Vector::new(coord() * 0.3, coord() * 0.3, coord() * 0.3));
        let first = (k * 3) as u32;
        indices.push([first, first + 1, first + 2]);
    }

    TriMesh::new(vertices, indices).unwrap()
}

#[test]
fn ray_cast_matches_brute_force() {
    let mesh = random_trimesh(42, 200);
    let mut rng = oorandom::Rand32::new(43);
    let mut coord = move || rng.rand_float() * 2.0 - 1.0;

    for _ in 0..50 {
        let ray = Ray::new(
            Point::new(coord() * 2.0, coord() * 2.0, coord() * 2.0),
            Vector::new(coord(), coord(), coord()),
        );
        if ray.dir.norm() < 1.0e-3 {
            continue;
        }

        let brute = (0..mesh.num_triangles() as u32)
            .filter_map(|i| {
                let tri = mesh.triangle(i);
                local_ray_intersection_with_triangle(&tri.a, &tri.b, &tri.c, &ray)
                    .map(|inter| inter.time_of_impact)
            })
            .fold(None::<Real>, |best, toi| {
                Some(best.map_or(toi, |b| b.min(toi)))
            })
            .filter(|toi| *toi <= 10.0);

        let fast = mesh.cast_local_ray(&ray, 10.0);

        match (brute, fast) {
            (None, None) => {}
            (Some(b), Some(f)) => assert!((b - f).abs() < 1.0e-5),
            _ => panic!("brute force and BVH disagree: {brute:?} vs {fast:?}"),
        }
    }
}

#[test]
fn point_projection_matches_brute_force() {
    let mesh = random_trimesh(7, 200);
    let mut rng = oorandom::Rand32::new(8);
    let mut coord = move || rng.rand_float() * 2.0 - 1.0;

    for _ in 0..50 {
        let pt = Point::new(coord() * 2.0, coord() * 2.0, coord() * 2.0);

        let brute = (0..mesh.num_triangles() as u32)
            .map(|i| mesh.triangle(i).project_local_point(&pt).point)
            .map(|proj| na::distance(&proj, &pt))
            .fold(Real::MAX, Real::min);

        let fast = mesh.distance_to_local_point(&pt);
        assert!((brute - fast).abs() < 1.0e-5);
    }
}
