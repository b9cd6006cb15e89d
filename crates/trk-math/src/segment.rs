//! Straight chord between two curve points.
//!
//! Both curve types use chords as a cheap stand-in for the curve itself
//! before refining on the real polynomial.

use serde::{Deserialize, Serialize};
use trk_core::EPSILON;

use crate::{Point3, Vector3};

/// Where a projected point falls relative to a finite parameter range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Extent {
    /// The nearest point lies before the start (`t < 0`).
    Before,
    /// `0 <= t <= 1`.
    #[default]
    Inside,
    /// The nearest point lies past the end (`t > 1`).
    After,
}

/// Result of projecting a point onto a [`LineSegment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordProjection {
    /// Unclamped line parameter.
    pub t: f64,
    /// Nearest point on the segment (clamped to its endpoints).
    pub position: Point3,
    pub extent: Extent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point3,
    pub end: Point3,
}

impl LineSegment {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Unnormalized direction `end - start`.
    pub fn direction(&self) -> Vector3 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Closest point on the segment to `p`.
    ///
    /// A zero-length segment answers with its start point.
    pub fn closest_point(&self, p: Point3) -> Point3 {
        let line = self.direction();
        let dot = (p - self.start).dot(line);
        if dot <= 0.0 {
            return self.start;
        }
        let length_sq = line.length_squared();
        if dot >= length_sq {
            return self.end;
        }
        self.start + line * (dot / length_sq)
    }

    /// Project `p` onto the infinite line and classify the parameter.
    pub fn project(&self, p: Point3) -> ChordProjection {
        let line = self.direction();
        let length_sq = line.length_squared();
        if length_sq <= EPSILON {
            return ChordProjection {
                t: 0.0,
                position: self.start,
                extent: Extent::Inside,
            };
        }

        let t = (p - self.start).dot(line) / length_sq;
        let (position, extent) = if t < 0.0 {
            (self.start, Extent::Before)
        } else if t > 1.0 {
            (self.end, Extent::After)
        } else {
            (self.start + line * t, Extent::Inside)
        };
        ChordProjection {
            t,
            position,
            extent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::dvec3;

    fn x_axis() -> LineSegment {
        LineSegment::new(Point3::ZERO, dvec3(10.0, 0.0, 0.0))
    }

    #[test]
    fn test_closest_point_clamps() {
        let seg = x_axis();
        assert_eq!(seg.closest_point(dvec3(-5.0, 1.0, 0.0)), seg.start);
        assert_eq!(seg.closest_point(dvec3(15.0, 1.0, 0.0)), seg.end);
        assert_abs_diff_eq!(
            seg.closest_point(dvec3(4.0, 3.0, -2.0)),
            dvec3(4.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_project_classifies_extent() {
        let seg = x_axis();
        let before = seg.project(dvec3(-2.0, 0.0, 1.0));
        assert_eq!(before.extent, Extent::Before);
        assert_abs_diff_eq!(before.t, -0.2, epsilon = 1e-12);
        assert_eq!(before.position, seg.start);

        let inside = seg.project(dvec3(2.5, 0.0, 1.0));
        assert_eq!(inside.extent, Extent::Inside);
        assert_abs_diff_eq!(inside.t, 0.25, epsilon = 1e-12);

        let after = seg.project(dvec3(12.0, 0.0, 0.0));
        assert_eq!(after.extent, Extent::After);
        assert_eq!(after.position, seg.end);
    }

    #[test]
    fn test_degenerate_segment() {
        let seg = LineSegment::new(dvec3(1.0, 1.0, 1.0), dvec3(1.0, 1.0, 1.0));
        let proj = seg.project(dvec3(5.0, 0.0, 0.0));
        assert_eq!(proj.t, 0.0);
        assert_eq!(proj.position, seg.start);
        assert!(proj.position.is_finite());
        assert_eq!(seg.closest_point(Point3::ZERO), seg.start);
    }
}
