//! Cross-track gates: the line a checkpoint, sector boundary or rule
//! trigger spans between the two boundaries.

use serde::{Deserialize, Serialize};
use trk_math::{LineSegment, Point3};
use trk_spline::Curve;

/// Centerline point with its projections onto both boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gate {
    pub center: Point3,
    pub left: Point3,
    pub right: Point3,
}

impl Gate {
    /// Gate across the track `distance` units along `central`.
    pub fn at_distance(
        central: &dyn Curve,
        left: &dyn Curve,
        right: &dyn Curve,
        distance: f64,
    ) -> Self {
        let center = central.sample_point(distance);
        Self {
            center,
            left: left.project_point(center).position,
            right: right.project_point(center).position,
        }
    }

    /// Gate with both ends pushed `amount` further away from the center.
    pub fn extended(&self, amount: f64) -> Self {
        let push = |end: Point3| end + (end - self.center).normalize_or_zero() * amount;
        Self {
            center: self.center,
            left: push(self.left),
            right: push(self.right),
        }
    }

    /// Left-to-right line of the gate.
    pub fn span(&self) -> LineSegment {
        LineSegment::new(self.left, self.right)
    }

    pub fn width(&self) -> f64 {
        self.left.distance(self.right)
    }
}
