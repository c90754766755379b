//! Accumulated free-space region: a set of rings with holes.

use crate::core::{Point2D, Pose2D};
use crate::geometry::{Contour, Line2D};

use super::clipper::{GeoClipper, PolygonClipper};

/// Nearest boundary edge of a [`ScanSolid`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidNearest {
    /// The nearest edge.
    pub edge: Line2D,
    /// Nearest point on that edge.
    pub point: Point2D,
    /// Distance from the query point.
    pub distance: f64,
}

/// A planar region made of outside rings and hole rings, possibly with
/// several components.
#[derive(Clone, Debug, Default)]
pub struct ScanSolid<C: PolygonClipper = GeoClipper> {
    contours: Vec<Contour>,
    clipper: C,
}

impl ScanSolid<GeoClipper> {
    /// Empty solid using the `geo` union backend.
    pub fn new() -> Self {
        Self::with_clipper(GeoClipper)
    }
}

impl<C: PolygonClipper> ScanSolid<C> {
    /// Empty solid using a custom union backend.
    pub fn with_clipper(clipper: C) -> Self {
        Self {
            contours: Vec::new(),
            clipper,
        }
    }

    /// Constituent rings.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// True if the solid has no rings.
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Discard all rings.
    pub fn reset(&mut self) {
        self.contours.clear();
    }

    /// Add a ring as-is, without any boolean operation.
    pub fn append(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    /// Union `contour`, given in `pose` coordinates, into the solid.
    pub fn union(&mut self, pose: Pose2D, contour: &Contour) {
        let incoming = [contour.transformed(pose)];
        self.contours = self.clipper.union(&self.contours, &incoming);
        log::trace!(
            "ScanSolid union: {} rings ({} holes)",
            self.contours.len(),
            self.contours.iter().filter(|c| c.hole).count()
        );
    }

    /// Parity containment: +1 per outside ring and -1 per hole containing
    /// `p`; inside iff the count is odd and positive.
    pub fn contains(&self, p: Point2D) -> bool {
        let count: i32 = self
            .contours
            .iter()
            .filter(|c| c.contains(p))
            .map(|c| if c.hole { -1 } else { 1 })
            .sum();
        count % 2 == 1
    }

    /// Nearest boundary edge over all rings.
    pub fn nearest(&self, p: Point2D) -> Option<SolidNearest> {
        self.contours
            .iter()
            .filter_map(|c| c.nearest(p))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .map(|n| SolidNearest {
                edge: n.edge,
                point: n.point,
                distance: n.distance,
            })
    }

    /// Net enclosed area (holes subtracted).
    pub fn area(&self) -> f64 {
        self.contours
            .iter()
            .map(|c| {
                let a = c.signed_area().abs();
                if c.hole { -a } else { a }
            })
            .sum()
    }
}
