//! Polygon union backend.
//!
//! [`ScanSolid`](super::ScanSolid) only needs `UNION` over ring sets with
//! holes; the winding and hole rules belong to the backend.

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use crate::core::Point2D;
use crate::geometry::{Contour, polygon_contains, signed_area};

/// Boolean union of two ring sets (holes tagged on each [`Contour`]).
pub trait PolygonClipper {
    /// Union of `a` and `b`, as a new ring set.
    fn union(&self, a: &[Contour], b: &[Contour]) -> Vec<Contour>;
}

/// [`PolygonClipper`] backed by the `geo` crate's `BooleanOps`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoClipper;

impl PolygonClipper for GeoClipper {
    fn union(&self, a: &[Contour], b: &[Contour]) -> Vec<Contour> {
        let a = to_multi_polygon(a);
        let b = to_multi_polygon(b);
        match (a.0.is_empty(), b.0.is_empty()) {
            (true, true) => Vec::new(),
            _ => from_multi_polygon(&a.union(&b)),
        }
    }
}

fn to_line_string(points: &[Point2D]) -> LineString<f64> {
    LineString::new(points.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
}

/// Group tagged rings into polygons: each hole joins the smallest outside
/// ring containing its first vertex.
fn to_multi_polygon(contours: &[Contour]) -> MultiPolygon<f64> {
    let outsides: Vec<&Contour> = contours
        .iter()
        .filter(|c| !c.hole && c.is_closed())
        .collect();
    let mut interiors: Vec<Vec<LineString<f64>>> = vec![Vec::new(); outsides.len()];

    for hole in contours.iter().filter(|c| c.hole && c.is_closed()) {
        let probe = hole.points[0];
        let owner = outsides
            .iter()
            .enumerate()
            .filter(|(_, o)| polygon_contains(&o.points, probe))
            .min_by(|(_, x), (_, y)| {
                signed_area(&x.points)
                    .abs()
                    .total_cmp(&signed_area(&y.points).abs())
            })
            .map(|(i, _)| i);
        match owner {
            Some(i) => interiors[i].push(to_line_string(&hole.points)),
            None => log::warn!(
                "Dropping hole ring of {} vertices with no enclosing boundary",
                hole.len()
            ),
        }
    }

    MultiPolygon::new(
        outsides
            .into_iter()
            .zip(interiors)
            .map(|(outside, holes)| Polygon::new(to_line_string(&outside.points), holes))
            .collect(),
    )
}

/// Strip the repeated closing coordinate geo keeps on every ring.
fn ring_points(ring: &LineString<f64>) -> Vec<Point2D> {
    let mut points: Vec<Point2D> = ring.coords().map(|c| Point2D::new(c.x, c.y)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn from_multi_polygon(mp: &MultiPolygon<f64>) -> Vec<Contour> {
    let mut contours = Vec::new();
    for polygon in mp.iter() {
        let exterior = ring_points(polygon.exterior());
        if exterior.len() >= 3 {
            contours.push(Contour::outside(exterior));
        }
        for interior in polygon.interiors() {
            let hole = ring_points(interior);
            if hole.len() >= 3 {
                contours.push(Contour::hole(hole));
            }
        }
    }
    contours
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point2D> {
        vec![
            Point2D::new(x0, y0),
            Point2D::new(x0 + size, y0),
            Point2D::new(x0 + size, y0 + size),
            Point2D::new(x0, y0 + size),
        ]
    }

    fn net_area(contours: &[Contour]) -> f64 {
        contours
            .iter()
            .map(|c| {
                let a = c.signed_area().abs();
                if c.hole { -a } else { a }
            })
            .sum()
    }

    #[test]
    fn test_union_overlapping_squares() {
        let a = vec![Contour::outside(square(0.0, 0.0, 2.0))];
        let b = vec![Contour::outside(square(1.0, 1.0, 2.0))];
        let result = GeoClipper.union(&a, &b);
        assert_eq!(result.len(), 1);
        assert!(!result[0].hole);
        assert_relative_eq!(net_area(&result), 7.0, epsilon = 1e-6);
    }

    #[test]
    fn test_union_disjoint_keeps_both() {
        let a = vec![Contour::outside(square(0.0, 0.0, 1.0))];
        let b = vec![Contour::outside(square(5.0, 0.0, 1.0))];
        let result = GeoClipper.union(&a, &b);
        assert_eq!(result.len(), 2);
        assert_relative_eq!(net_area(&result), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_hole_survives_round_trip() {
        let a = vec![
            Contour::outside(square(0.0, 0.0, 4.0)),
            Contour::hole(square(1.0, 1.0, 1.0)),
        ];
        let result = GeoClipper.union(&a, &[]);
        assert_eq!(result.iter().filter(|c| c.hole).count(), 1);
        assert_relative_eq!(net_area(&result), 15.0, epsilon = 1e-6);
    }

    #[test]
    fn test_union_fills_hole() {
        let a = vec![
            Contour::outside(square(0.0, 0.0, 4.0)),
            Contour::hole(square(1.0, 1.0, 1.0)),
        ];
        let b = vec![Contour::outside(square(0.5, 0.5, 2.0))];
        let result = GeoClipper.union(&a, &b);
        assert!(result.iter().all(|c| !c.hole));
        assert_relative_eq!(net_area(&result), 16.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(GeoClipper.union(&[], &[]).is_empty());
        let degenerate = vec![Contour::outside(vec![Point2D::ZERO, Point2D::new(1.0, 0.0)])];
        assert!(GeoClipper.union(&degenerate, &[]).is_empty());
    }
}
