//! Curve trait and implementations.

mod cache;
mod catmull_rom;
mod cubic;
mod hermite;

use serde::{Deserialize, Serialize};
use trk_core::EPSILON;
use trk_math::{horizontal_cross, Extent, Point3, Vector3};

pub use cache::SampleCache;
pub use catmull_rom::{CatmullRomCurve, NearestPoint};
pub use cubic::CubicSegment;
pub use hermite::{turn_radius, HermiteCurve};

/// Position and parameter derivatives at a distance along a curve.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveSample {
    pub position: Point3,
    /// First derivative with respect to the segment-local parameter.
    pub velocity: Vector3,
    /// Second derivative with respect to the segment-local parameter.
    pub acceleration: Vector3,
}

impl CurveSample {
    /// A sample that sits still at `position`.
    pub fn at_rest(position: Point3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Result of projecting a point onto a curve.
///
/// Carries both views a caller may want: the curve point with its direction,
/// and the longitudinal/lateral coordinates of the query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveProjection {
    /// Nearest point found on the curve.
    pub position: Point3,
    /// Unit tangent at `position` (zero when the curve has no direction there).
    pub direction: Vector3,
    /// Arc-length distance of `position` from the curve start.
    pub along: f64,
    /// Signed lateral offset of the query from `position`.
    pub across: f64,
    /// Segment the projection landed on; feed it back as the next query's hint.
    pub segment: usize,
    /// Segment-local parameter in `[0, 1]`.
    pub t: f64,
    pub extent: Extent,
}

impl CurveProjection {
    /// Fill in `across` for `query`, using the lateral sign convention shared
    /// by every curve type.
    pub(crate) fn with_offset_of(mut self, query: Point3, tangent: Vector3) -> Self {
        self.across = signed_offset(query, self.position, tangent);
        self.direction = tangent.normalize_or_zero();
        self
    }
}

/// Trait for arc-length parameterized track curves.
///
/// Everything that only samples or projects goes through this trait so it
/// works with any curve kind.
pub trait Curve: Send + Sync {
    /// Total arc length.
    fn length(&self) -> f64;

    /// Number of distinct control points.
    fn point_count(&self) -> usize;

    /// Number of polynomial segments.
    fn segment_count(&self) -> usize;

    /// Whether distances wrap around instead of clamping.
    fn is_closed(&self) -> bool;

    /// Control point at `index`.
    fn point(&self, index: usize) -> Point3;

    /// Evaluate the curve `distance` units from its start.
    fn sample(&self, distance: f64) -> CurveSample;

    /// Position `distance` units from the start.
    fn sample_point(&self, distance: f64) -> Point3 {
        self.sample(distance).position
    }

    /// Nearest point on the curve to `point`.
    fn project_point(&self, point: Point3) -> CurveProjection {
        self.project_point_hinted(point, None)
    }

    /// Nearest point on the curve to `point`, biased by the segment a
    /// previous query landed on.
    fn project_point_hinted(&self, point: Point3, hint: Option<usize>) -> CurveProjection;
}

/// Bring `distance` into `[0, length]`: wrap for closed curves, clamp otherwise.
pub(crate) fn limit_distance(distance: f64, length: f64, closed: bool) -> f64 {
    if length <= EPSILON {
        return 0.0;
    }
    if closed {
        distance.rem_euclid(length)
    } else {
        distance.clamp(0.0, length)
    }
}

/// Distance of `query` from `position`, negative when `query` lies on the
/// side where `(query - position) × tangent` points up.
pub(crate) fn signed_offset(query: Point3, position: Point3, tangent: Vector3) -> f64 {
    let delta = query - position;
    let distance = delta.length();
    if horizontal_cross(delta, tangent) > 0.0 {
        -distance
    } else {
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trk_math::dvec3;

    #[test]
    fn test_limit_distance_wraps_and_clamps() {
        assert_eq!(limit_distance(12.0, 10.0, true), 2.0);
        assert_eq!(limit_distance(-2.0, 10.0, true), 8.0);
        assert_eq!(limit_distance(25.0, 10.0, true), 5.0);
        assert_eq!(limit_distance(12.0, 10.0, false), 10.0);
        assert_eq!(limit_distance(-2.0, 10.0, false), 0.0);
        assert_eq!(limit_distance(3.0, 0.0, true), 0.0);
    }

    #[test]
    fn test_signed_offset_convention() {
        let tangent = dvec3(1.0, 0.0, 0.0);
        assert_eq!(signed_offset(dvec3(0.0, 0.0, 2.0), Point3::ZERO, tangent), -2.0);
        assert_eq!(signed_offset(dvec3(0.0, 0.0, -2.0), Point3::ZERO, tangent), 2.0);
        // Height difference alone keeps the positive sign.
        assert_eq!(signed_offset(dvec3(0.0, 3.0, 0.0), Point3::ZERO, tangent), 3.0);
    }
}
