//! Power-basis cubic segment shared by both curve types.

use serde::{Deserialize, Serialize};
use trk_math::{Point3, Vector3};

use crate::quadrature;

/// `position(t) = a + b·t + c·t² + d·t³` for `t` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CubicSegment {
    pub a: Vector3,
    pub b: Vector3,
    pub c: Vector3,
    pub d: Vector3,
}

impl CubicSegment {
    /// Uniform Catmull-Rom segment from `p1` to `p2` with neighbors `p0`, `p3`.
    pub fn catmull_rom(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        let (p0, p1, p2, p3) = (p0 * 0.5, p1 * 0.5, p2 * 0.5, p3 * 0.5);
        Self {
            a: 2.0 * p1,
            b: p2 - p0,
            c: 2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3,
            d: -p0 + 3.0 * p1 - 3.0 * p2 + p3,
        }
    }

    /// Hermite segment between `p1` and `p2`.
    ///
    /// `v1` and `v2` must already be scaled to the segment's own parameter
    /// domain (unit tangent times segment length).
    pub fn hermite(p1: Point3, p2: Point3, v1: Vector3, v2: Vector3) -> Self {
        Self {
            a: p1,
            b: v1,
            c: 3.0 * (p2 - p1) - 2.0 * v1 - v2,
            d: 2.0 * (p1 - p2) + v1 + v2,
        }
    }

    pub fn position(&self, t: f64) -> Point3 {
        self.a + t * (self.b + t * (self.c + self.d * t))
    }

    pub fn velocity(&self, t: f64) -> Vector3 {
        self.b + t * (2.0 * self.c + 3.0 * self.d * t)
    }

    pub fn acceleration(&self, t: f64) -> Vector3 {
        2.0 * self.c + 6.0 * self.d * t
    }

    /// Arc length over `[0, 1]` by five-point Gauss-Legendre quadrature.
    pub fn arc_length(&self) -> f64 {
        quadrature::integrate_unit(|t| self.velocity(t).length())
    }
}
