use approx::assert_relative_eq;
use shroud3d::math::{Point, Vector};
use shroud3d::query::{Ray, RayCast};
use shroud3d::shape::Triangle;

fn unit_triangle() -> Triangle {
    Triangle::new(
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    )
}

#[test]
fn hit_from_below_reports_distance_and_facing_normal() {
    let tri = unit_triangle();
    let ray = Ray::new(Point::new(0.2, 0.2, -1.0), Vector::z());

    let inter = tri.cast_local_ray_and_get_normal(&ray, 10.0).unwrap();
    assert_relative_eq!(inter.time_of_impact, 1.0, epsilon = 1.0e-6);
    // The normal faces the ray origin.
    assert!(inter.normal.z < 0.0);
}

#[test]
fn hit_from_above_reports_facing_normal() {
    let tri = unit_triangle();
    let ray = Ray::new(Point::new(0.2, 0.2, 2.0), -Vector::z());

    let inter = tri.cast_local_ray_and_get_normal(&ray, 10.0).unwrap();
    assert_relative_eq!(inter.time_of_impact, 2.0, epsilon = 1.0e-6);
    assert!(inter.normal.z > 0.0);
}

#[test]
fn miss_outside_the_triangle() {
    let tri = unit_triangle();
    let ray = Ray::new(Point::new(2.0, 2.0, -1.0), Vector::z());
    assert!(tri.cast_local_ray(&ray, 10.0).is_none());
}

#[test]
fn miss_past_max_time_of_impact() {
    let tri = unit_triangle();
    let ray = Ray::new(Point::new(0.2, 0.2, -1.0), Vector::z());
    assert!(tri.cast_local_ray(&ray, 0.5).is_none());
}

#[test]
fn parallel_ray_misses() {
    let tri = unit_triangle();
    let ray = Ray::new(Point::new(0.2, 0.2, 0.0), Vector::x());
    assert!(tri.cast_local_ray(&ray, 10.0).is_none());
}
