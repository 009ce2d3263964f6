use common::collision_detection::{circle_circle, circle_rect, circle_sector};
use common::shapes::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_normalize() {
    assert_eq!(normalize(3.0, 4.0), (0.6, 0.8));
    assert_eq!(normalize(0.0, 1.0), (0.0, 1.0));
    // Degenerate directions pass through.
    assert_eq!(normalize(0.0, 0.0), (0.0, 0.0));
}

#[test]
fn test_aabb_expand_and_contains() {
    let mut aabb = Aabb::from_point(1.0, 1.0);
    aabb.expand_to_include(-2.0, 4.0);
    assert_eq!(aabb, Aabb::new(-2.0, 1.0, 1.0, 4.0));
    assert_eq!(aabb.width(), 3.0);
    assert_eq!(aabb.height(), 3.0);
    assert!(aabb.contains_point(0.0, 2.0));
    assert!(!aabb.contains_point(2.0, 2.0));
    assert!(!Aabb::new(0.0, 0.0, f32::NAN, 1.0).is_finite());
}

#[test]
fn test_random_point_inside() {
    let aabb = Aabb::new(0.0, 0.0, 100.0, 50.0);
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);
    for _ in 0..100 {
        let (x, z) = aabb.random_point_inside(5.0, &mut rng);
        assert!(x >= 5.0 && x <= 95.0);
        assert!(z >= 5.0 && z <= 45.0);
    }

    // Margins larger than the box clamp to the low corner.
    let tiny = Aabb::new(0.0, 0.0, 2.0, 2.0);
    assert_eq!(tiny.random_point_inside(5.0, &mut rng), (5.0, 5.0));
}

#[test]
fn test_circle_circle() {
    assert!(circle_circle(0.0, 0.0, 1.0, 1.5, 0.0, 1.0));
    // Touching counts as overlap.
    assert!(circle_circle(0.0, 0.0, 1.0, 2.0, 0.0, 1.0));
    assert!(!circle_circle(0.0, 0.0, 1.0, 2.0, 0.1, 1.0));
    assert!(circle_circle(5.0, 5.0, 0.0, 5.0, 5.0, 0.0));
}

#[test]
fn test_circle_circle_large_coordinates() {
    let x = 1_000_000.0f32;
    assert!(circle_circle(x, x, 3.0, x + 4.0, x + 3.0, 2.0));
    assert!(!circle_circle(x, x, 2.0, x + 4.0, x + 3.0, 2.0));
}

#[test]
fn test_circle_rect_axis_aligned() {
    // Facing +z: half_width spans x, half_height spans z.
    let rect = OrientedRect::new(0.0, 0.0, 0.0, 1.0, 2.0, 1.0);
    assert!(circle_rect(&rect, 0.0, 0.0, 0.0));
    assert!(circle_rect(&rect, 3.0, 0.0, 1.0));
    assert!(!circle_rect(&rect, 3.5, 0.0, 1.0));
    assert!(circle_rect(&rect, 0.0, 1.9, 1.0));
    assert!(!circle_rect(&rect, 0.0, 2.5, 1.0));
}

#[test]
fn test_circle_rect_corner() {
    let rect = OrientedRect::new(0.0, 0.0, 0.0, 1.0, 2.0, 1.0);
    // Corner at (2, 1); the circle center is (1, 1) away on both axes.
    assert!(circle_rect(&rect, 3.0, 2.0, 1.5));
    assert!(!circle_rect(&rect, 3.0, 2.0, 1.4));
    assert!(!circle_rect(&rect, -3.0, -2.0, 1.4));
}

#[test]
fn test_circle_rect_rotated() {
    let rect = OrientedRect::new(0.0, 0.0, 1.0, 1.0, 1.0, 3.0);
    assert!(approx(rect.dir_x, 0.70710677));
    assert!(circle_rect(&rect, 2.0, 2.0, 0.1));
    assert!(!circle_rect(&rect, 2.0, -2.0, 0.1));
    assert!(!circle_rect(&rect, 3.0, 3.0, 0.1));
}

#[test]
fn test_rect_corners_and_bounding_box() {
    let rect = OrientedRect::new(10.0, 20.0, 0.0, 1.0, 2.0, 1.0);
    let corners = rect.corners();
    assert_eq!(corners[0], (8.0, 21.0));
    assert_eq!(corners[1], (12.0, 21.0));
    assert_eq!(corners[2], (8.0, 19.0));
    assert_eq!(corners[3], (12.0, 19.0));
    assert_eq!(rect.bounding_box(), Aabb::new(8.0, 19.0, 12.0, 21.0));

    let rotated = OrientedRect::new(0.0, 0.0, 1.0, 1.0, 1.0, 1.0);
    let bb = rotated.bounding_box();
    for (x, z) in rotated.corners() {
        assert!(x >= bb.min_x - 1e-4 && x <= bb.max_x + 1e-4);
        assert!(z >= bb.min_z - 1e-4 && z <= bb.max_z + 1e-4);
    }
    assert!(approx(bb.max_x, 2.0f32.sqrt()));
}

#[test]
fn test_circle_sector_narrow() {
    let sector = Sector::from_degrees(0.0, 0.0, 1.0, 0.0, 90.0, 10.0);
    assert!(approx(sector.half_angle, PI / 4.0));
    assert!(circle_sector(&sector, 5.0, 0.0, 0.0));
    assert!(circle_sector(&sector, 5.0, 4.9, 0.0));
    assert!(!circle_sector(&sector, 5.0, 5.5, 0.0));
    assert!(!circle_sector(&sector, 0.0, 5.0, 0.0));
    assert!(!circle_sector(&sector, -3.0, 0.0, 0.0));
    assert!(!circle_sector(&sector, 11.0, 0.0, 0.5));
    // The pulled-back apex lets a wide entity just outside the edge through.
    assert!(circle_sector(&sector, 5.0, 5.5, 1.0));
}

#[test]
fn test_circle_sector_wide() {
    let sector = Sector::from_degrees(0.0, 0.0, 1.0, 0.0, 270.0, 10.0);
    assert!(circle_sector(&sector, 0.0, 5.0, 0.0));
    assert!(circle_sector(&sector, -1.0, 5.0, 0.0));
    assert!(!circle_sector(&sector, -5.0, 0.1, 0.0));
    assert!(!circle_sector(&sector, 0.0, 10.5, 0.0));
}

#[test]
fn test_circle_sector_full_circle() {
    let sector = Sector::from_degrees(0.0, 0.0, 0.0, 1.0, 400.0, 10.0);
    assert!(sector.is_full_circle());
    assert!(circle_sector(&sector, -9.0, 0.0, 0.0));
    assert!(circle_sector(&sector, 0.0, -9.0, 0.0));
    assert!(!circle_sector(&sector, 0.0, -12.0, 1.0));
}

#[test]
fn test_sector_bounding_box() {
    let sector = Sector::from_degrees(0.0, 0.0, 1.0, 0.0, 90.0, 10.0);
    let bb = sector.bounding_box();
    assert!(approx(bb.min_x, 0.0));
    assert!(approx(bb.max_x, 10.0));
    assert!(approx(bb.min_z, -7.0710678));
    assert!(approx(bb.max_z, 7.0710678));

    let half = Sector::from_degrees(0.0, 0.0, 0.0, 1.0, 180.0, 10.0);
    let bb = half.bounding_box();
    assert!(approx(bb.min_x, -10.0));
    assert!(approx(bb.max_x, 10.0));
    assert!(approx(bb.min_z, 0.0));
    assert!(approx(bb.max_z, 10.0));

    let full = Sector::from_degrees(5.0, 5.0, 0.0, 1.0, 360.0, 10.0);
    assert_eq!(full.bounding_box(), Aabb::new(-5.0, -5.0, 15.0, 15.0));
}

#[test]
fn test_sector_bounding_box_contains_arc() {
    let mut rng: StdRng = SeedableRng::seed_from_u64(7);
    for _ in 0..200 {
        let angle = rng.gen_range(1.0..359.0f32);
        let heading = rng.gen_range(0.0..(2.0 * PI));
        let sector =
            Sector::from_degrees(0.0, 0.0, heading.cos(), heading.sin(), angle, 20.0);
        let bb = sector.bounding_box();
        let steps = 64;
        for i in 0..=steps {
            let t = -sector.half_angle + 2.0 * sector.half_angle * i as f32 / steps as f32;
            let a = heading + t;
            let (x, z) = (20.0 * a.cos(), 20.0 * a.sin());
            assert!(x >= bb.min_x - 1e-3 && x <= bb.max_x + 1e-3);
            assert!(z >= bb.min_z - 1e-3 && z <= bb.max_z + 1e-3);
        }
    }
}

#[test]
fn test_sector_safe_circle() {
    let sector = Sector::from_degrees(0.0, 0.0, 1.0, 0.0, 60.0, 30.0);
    let safe = sector.safe_circle().expect("sector has a safe region");
    assert!(approx(safe.x, 20.0));
    assert!(approx(safe.z, 0.0));
    assert!(approx(safe.radius, 10.0));

    let wide = Sector::from_degrees(0.0, 0.0, 0.0, 1.0, 200.0, 30.0);
    let safe = wide.safe_circle().expect("sector has a safe region");
    assert!(approx(safe.x, 0.0));
    assert!(approx(safe.z, 15.0));
    assert!(approx(safe.radius, 15.0));

    assert!(Sector::from_degrees(0.0, 0.0, 1.0, 0.0, 0.0, 30.0)
        .safe_circle()
        .is_none());
}

#[test]
fn test_safe_circles_lie_inside_shapes() {
    let mut rng: StdRng = SeedableRng::seed_from_u64(99);
    for _ in 0..500 {
        let heading = rng.gen_range(0.0..(2.0 * PI));
        let shape = match rng.gen_range(0..3) {
            0 => ShapeEnum::Circle(Circle::new(50.0, 50.0, rng.gen_range(1.0..40.0))),
            1 => ShapeEnum::Rect(OrientedRect::new(
                50.0,
                50.0,
                heading.cos(),
                heading.sin(),
                rng.gen_range(1.0..40.0),
                rng.gen_range(1.0..40.0),
            )),
            _ => ShapeEnum::Sector(Sector::from_degrees(
                50.0,
                50.0,
                heading.cos(),
                heading.sin(),
                rng.gen_range(10.0..360.0),
                rng.gen_range(1.0..40.0),
            )),
        };
        let safe = shape.safe_circle().expect("non-degenerate shape");
        for _ in 0..20 {
            let a = rng.gen_range(0.0..(2.0 * PI));
            let d = rng.gen_range(0.0..0.99f32) * safe.radius;
            let (x, z) = (safe.x + d * a.cos(), safe.z + d * a.sin());
            assert!(
                shape.overlaps_circle(x, z, 0.0),
                "{:?} rejected ({}, {}) from its own safe circle",
                shape,
                x,
                z
            );
        }
    }
}

#[test]
fn test_circle_shape() {
    let circle = Circle::new(2.0, 3.0, 4.0);
    assert_eq!(circle.bounding_box(), Aabb::new(-2.0, -1.0, 6.0, 7.0));
    assert_eq!(circle.safe_circle(), Some(circle));
    assert!(Circle::new(0.0, 0.0, 0.0).safe_circle().is_none());
    assert!(circle.overlaps_circle(7.0, 3.0, 1.0));
    assert!(!circle.overlaps_circle(7.5, 3.0, 1.0));
}

#[test]
fn test_accepted_centers_stay_within_reach() {
    let mut rng: StdRng = SeedableRng::seed_from_u64(5);
    for _ in 0..300 {
        let heading = rng.gen_range(0.0..(2.0 * PI));
        let radius = rng.gen_range(1.0..10.0);
        let shape = match rng.gen_range(0..3) {
            0 => ShapeEnum::Circle(Circle::new(0.0, 0.0, rng.gen_range(0.0..50.0))),
            1 => ShapeEnum::Rect(OrientedRect::new(
                0.0,
                0.0,
                heading.cos(),
                heading.sin(),
                rng.gen_range(0.0..50.0),
                rng.gen_range(0.0..50.0),
            )),
            _ => ShapeEnum::Sector(Sector::from_degrees(
                0.0,
                0.0,
                heading.cos(),
                heading.sin(),
                rng.gen_range(0.0..360.0),
                rng.gen_range(0.0..50.0),
            )),
        };
        let bb = shape.bounding_box();
        let margin = shape.reach() as f32 * radius;
        for _ in 0..200 {
            let x = rng.gen_range(-120.0..120.0);
            let z = rng.gen_range(-120.0..120.0);
            if shape.overlaps_circle(x, z, radius) {
                assert!(
                    x >= bb.min_x - margin && x <= bb.max_x + margin,
                    "{:?} accepted x {} with radius {}",
                    shape,
                    x,
                    radius
                );
                assert!(z >= bb.min_z - margin && z <= bb.max_z + margin);
            }
        }
    }
    assert_eq!(
        Sector::from_degrees(0.0, 0.0, 1.0, 0.0, 360.0, 5.0).reach(),
        1
    );
    assert_eq!(Circle::new(0.0, 0.0, 5.0).reach(), 1);
}
