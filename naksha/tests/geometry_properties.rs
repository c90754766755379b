//! Randomised geometry properties checked against independent references.

mod common;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use naksha::core::{Point2D, Pose2D, angle_diff, pose_compose, pose_decompose};
use naksha::geometry::{Line2D, polygon_contains, polygon_intersection_area, signed_area};

const TRIALS: usize = 500;

fn random_point(rng: &mut StdRng, extent: f64) -> Point2D {
    Point2D::new(rng.random_range(-extent..extent), rng.random_range(-extent..extent))
}

fn random_pose(rng: &mut StdRng) -> Pose2D {
    Pose2D::new(
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
        rng.random_range(-std::f64::consts::PI..std::f64::consts::PI),
    )
}

// ============================================================================
// Segment projection
// ============================================================================

#[test]
fn test_projection_parameter_and_distance() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..TRIALS {
        let line = Line2D::new(random_point(&mut rng, 5.0), random_point(&mut rng, 5.0));
        let p = random_point(&mut rng, 8.0);
        let proj = line.project(p);

        assert!((0.0..=1.0).contains(&proj.t), "t = {}", proj.t);
        assert_relative_eq!(proj.distance, proj.point.distance(p), epsilon = 1e-12);
        assert_relative_eq!(proj.point.x, line.point_at(proj.t).x, epsilon = 1e-12);

        // No sampled point on the segment is closer.
        for k in 0..=20 {
            let q = line.point_at(k as f64 / 20.0);
            assert!(proj.distance <= q.distance(p) + 1e-9);
        }
    }
}

// ============================================================================
// Pose composition
// ============================================================================

#[test]
fn test_compose_decompose_roundtrip() {
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..TRIALS {
        let local = random_pose(&mut rng);
        let frame = random_pose(&mut rng);

        let global = pose_compose(local, frame);
        let back = pose_decompose(global, frame);
        assert_relative_eq!(back.x, local.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, local.y, epsilon = 1e-9);
        assert_relative_eq!(angle_diff(back.theta, local.theta), 0.0, epsilon = 1e-9);

        let again = pose_compose(pose_decompose(local, frame), frame);
        assert_relative_eq!(again.x, local.x, epsilon = 1e-9);
        assert_relative_eq!(again.y, local.y, epsilon = 1e-9);
    }
}

// ============================================================================
// Point in polygon
// ============================================================================

/// Convex CCW polygon with `n` vertices on a jittered circle.
fn convex_ring(rng: &mut StdRng, n: usize) -> Vec<Point2D> {
    let center = random_point(rng, 3.0);
    let radius = rng.random_range(1.0..4.0);
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64 + rng.random_range(0.0..0.5)) / n as f64;
            center + Point2D::from_polar(radius, angle)
        })
        .collect()
}

/// Strictly inside a convex CCW ring, or `None` if too near an edge to tell.
fn convex_reference(ring: &[Point2D], p: Point2D) -> Option<bool> {
    let mut inside = true;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let c = (b - a).cross(p - a);
        if c.abs() < 1e-9 {
            return None;
        }
        inside &= c > 0.0;
    }
    Some(inside)
}

#[test]
fn test_contains_matches_convex_reference() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..50 {
        let n = rng.random_range(3..12);
        let ring = convex_ring(&mut rng, n);
        assert!(signed_area(&ring) > 0.0);
        for _ in 0..100 {
            let p = random_point(&mut rng, 8.0);
            if let Some(expected) = convex_reference(&ring, p) {
                assert_eq!(polygon_contains(&ring, p), expected, "{p:?} in {ring:?}");
            }
        }
    }
}

/// Star-shaped CCW ring: increasing angles around a centre, random radii.
fn star_ring(rng: &mut StdRng, n: usize) -> Vec<Point2D> {
    let center = random_point(rng, 3.0);
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64 + rng.random_range(0.0..0.8)) / n as f64;
            center + Point2D::from_polar(rng.random_range(0.3..4.0), angle)
        })
        .collect()
}

/// Plain crossing-number test with a half-open span per edge.
fn crossing_reference(ring: &[Point2D], p: Point2D) -> bool {
    let mut inside = false;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        if (a.y < p.y) != (b.y < p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn near_boundary(ring: &[Point2D], p: Point2D) -> bool {
    (0..ring.len()).any(|i| {
        let edge = Line2D::new(ring[i], ring[(i + 1) % ring.len()]);
        edge.project(p).distance < 1e-9
    })
}

#[test]
fn test_contains_matches_crossing_reference_for_star_rings() {
    let mut rng = StdRng::seed_from_u64(14);
    let mut concave = 0;
    for _ in 0..200 {
        let n = rng.random_range(5..15);
        let ring = star_ring(&mut rng, n);
        assert!(signed_area(&ring) > 0.0);
        let reflex = (0..n).any(|i| {
            let prev = ring[(i + n - 1) % n];
            let next = ring[(i + 1) % n];
            (ring[i] - prev).cross(next - ring[i]) < 0.0
        });
        if reflex {
            concave += 1;
        }

        for k in 0..200 {
            let mut p = random_point(&mut rng, 8.0);
            // Every other sample sits level with a vertex.
            if k % 2 == 0 {
                p.y = ring[rng.random_range(0..n)].y;
            }
            if near_boundary(&ring, p) {
                continue;
            }
            assert_eq!(
                polygon_contains(&ring, p),
                crossing_reference(&ring, p),
                "{p:?} in {ring:?}"
            );
        }
    }
    assert!(concave > 100, "only {concave} concave rings generated");
}

#[test]
fn test_contains_boundary_rule() {
    let square = [
        Point2D::new(0.0, 0.0),
        Point2D::new(1.0, 0.0),
        Point2D::new(1.0, 1.0),
        Point2D::new(0.0, 1.0),
    ];
    assert!(!polygon_contains(&square, Point2D::new(0.5, 0.0)));
    assert!(polygon_contains(&square, Point2D::new(0.5, 1.0)));
    assert!(polygon_contains(&square, Point2D::new(1.0, 0.5)));
    assert!(!polygon_contains(&square, Point2D::new(0.0, 0.5)));
}

// ============================================================================
// Intersection area
// ============================================================================

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2D> {
    vec![
        Point2D::new(x0, y0),
        Point2D::new(x1, y0),
        Point2D::new(x1, y1),
        Point2D::new(x0, y1),
    ]
}

#[test]
fn test_intersection_area_of_rectangles() {
    let mut rng = StdRng::seed_from_u64(14);
    for _ in 0..200 {
        let mut corners = || {
            let (a, b): (f64, f64) = (rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
            (a.min(b), a.max(b) + 0.1)
        };
        let (ax0, ax1) = corners();
        let (ay0, ay1) = corners();
        let (bx0, bx1) = corners();
        let (by0, by1) = corners();

        let overlap_x = (ax1.min(bx1) - ax0.max(bx0)).max(0.0);
        let overlap_y = (ay1.min(by1) - ay0.max(by0)).max(0.0);
        let expected = overlap_x * overlap_y;

        let area = polygon_intersection_area(&rect(ax0, ay0, ax1, ay1), &rect(bx0, by0, bx1, by1));
        assert_relative_eq!(area, expected, epsilon = 1e-4);
    }
}

#[test]
fn test_intersection_with_self_is_area() {
    let mut rng = StdRng::seed_from_u64(15);
    for _ in 0..20 {
        let ring = convex_ring(&mut rng, 7);
        let area = polygon_intersection_area(&ring, &ring);
        assert_relative_eq!(area, signed_area(&ring), epsilon = 1e-4);
    }
}
