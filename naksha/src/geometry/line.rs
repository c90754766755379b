//! Line segments: nearest point and intersection.

use serde::{Deserialize, Serialize};

use crate::core::{GEOM_EPSILON, Point2D, Pose2D};

/// A line segment from `pa` to `pb`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Line2D {
    /// Start point.
    pub pa: Point2D,
    /// End point.
    pub pb: Point2D,
}

/// Projection of a point onto a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentProjection {
    /// Nearest point on the segment.
    pub point: Point2D,
    /// Projection parameter, clamped to [0, 1].
    pub t: f64,
    /// Euclidean distance from the query point to `point`.
    pub distance: f64,
}

impl Line2D {
    /// Create a new segment.
    #[inline]
    pub const fn new(pa: Point2D, pb: Point2D) -> Self {
        Self { pa, pb }
    }

    /// Direction vector `pb - pa`.
    #[inline]
    pub fn direction(&self) -> Point2D {
        self.pb - self.pa
    }

    /// Segment length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Point at parameter `t` (0 = `pa`, 1 = `pb`).
    #[inline]
    pub fn point_at(&self, t: f64) -> Point2D {
        self.pa + self.direction() * t
    }

    /// Project `p` onto the segment.
    ///
    /// Degenerate segments (`|pb - pa|² < 1e-16`) project onto `pa`.
    pub fn project(&self, p: Point2D) -> SegmentProjection {
        let d = self.direction();
        let len_sq = d.length_squared();
        let t = if len_sq < GEOM_EPSILON {
            0.0
        } else {
            (d.dot(p - self.pa) / len_sq).clamp(0.0, 1.0)
        };
        let point = self.point_at(t);
        SegmentProjection {
            point,
            t,
            distance: point.distance(p),
        }
    }

    /// Segment mapped from `frame` coordinates into the parent frame.
    #[inline]
    pub fn transformed(&self, frame: Pose2D) -> Self {
        Self::new(frame.transform_point(self.pa), frame.transform_point(self.pb))
    }
}

/// Nearest point on `line` to `p`, and its distance.
#[inline]
pub fn nearest_point_on_segment(line: &Line2D, p: Point2D) -> (Point2D, f64) {
    let proj = line.project(p);
    (proj.point, proj.distance)
}

/// Intersection point of two segments.
///
/// Returns `None` for parallel or degenerate pairs (`|det| < 1e-16`) and
/// when either parameter falls outside [0, 1]. Touching endpoints count.
pub fn segment_intersect(a: &Line2D, b: &Line2D) -> Option<Point2D> {
    let da = a.direction();
    let db = b.direction();
    let det = da.y * db.x - da.x * db.y;
    if det.abs() < GEOM_EPSILON {
        return None;
    }

    // Solve pa + s·da = pb + t·db
    let w = b.pa - a.pa;
    let s = (db.x * w.y - db.y * w.x) / det;
    let t = (da.x * w.y - da.y * w.x) / det;

    if !(0.0..=1.0).contains(&s) || !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(a.point_at(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Line2D {
        Line2D::new(Point2D::new(ax, ay), Point2D::new(bx, by))
    }

    #[test]
    fn test_nearest_interior() {
        let line = seg(0.0, 0.0, 4.0, 0.0);
        let (p, d) = nearest_point_on_segment(&line, Point2D::new(1.5, 2.0));
        assert_relative_eq!(p.x, 1.5);
        assert_relative_eq!(p.y, 0.0);
        assert_relative_eq!(d, 2.0);
    }

    #[test]
    fn test_nearest_clamps_to_endpoints() {
        let line = seg(0.0, 0.0, 1.0, 0.0);
        let proj = line.project(Point2D::new(-3.0, 4.0));
        assert_eq!(proj.t, 0.0);
        assert_relative_eq!(proj.distance, 5.0);

        let proj = line.project(Point2D::new(4.0, 4.0));
        assert_eq!(proj.t, 1.0);
        assert_relative_eq!(proj.distance, 5.0);
    }

    #[test]
    fn test_degenerate_segment_projects_to_start() {
        let line = seg(2.0, 2.0, 2.0, 2.0);
        let proj = line.project(Point2D::new(5.0, 6.0));
        assert_eq!(proj.t, 0.0);
        assert_eq!(proj.point, Point2D::new(2.0, 2.0));
        assert_relative_eq!(proj.distance, 5.0);
    }

    #[test]
    fn test_intersect_crossing() {
        let a = seg(0.0, 0.0, 2.0, 2.0);
        let b = seg(0.0, 2.0, 2.0, 0.0);
        let p = segment_intersect(&a, &b).expect("segments cross");
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_misses_outside_parameter_range() {
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(2.0, -1.0, 2.0, 1.0);
        assert!(segment_intersect(&a, &b).is_none());
        assert!(segment_intersect(&b, &a).is_none());
    }

    #[test]
    fn test_intersect_parallel_is_none() {
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(0.0, 1.0, 1.0, 1.0);
        assert!(segment_intersect(&a, &b).is_none());
        // Collinear overlap is also reported as no intersection.
        let c = seg(0.5, 0.0, 1.5, 0.0);
        assert!(segment_intersect(&a, &c).is_none());
    }

    #[test]
    fn test_intersect_touching_endpoint() {
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(1.0, 0.0, 1.0, 1.0);
        let p = segment_intersect(&a, &b).expect("endpoints touch");
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 0.0);
    }
}
