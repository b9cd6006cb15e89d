//! Zone ribbons: closed outlines of a stretch of track between two boundary
//! curves.

use serde::{Deserialize, Serialize};
use trk_math::Point3;

use crate::curve::Curve;
use crate::sampling::calc_step;

/// Category of a clip zone. Only consumers attach meaning to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ZoneKind {
    #[default]
    Default,
    Bad,
    PointsFactor,
    SpeedControl,
}

/// A stretch of track measured along the centerline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneDescriptor {
    pub kind: ZoneKind,
    /// Start distance along the centerline.
    pub distance: f64,
    /// Extent along the centerline; may be negative to run backwards.
    pub length: f64,
    /// Ribbon width measured from the near edge.
    pub width: f64,
    /// Where the ribbon sits in the slack between the boundaries: 0 hugs the
    /// left boundary, 1 hugs the right one.
    pub bias: f64,
    /// Scoring/speed factor, opaque to the sampler.
    pub factor: f64,
}

impl Default for ZoneDescriptor {
    fn default() -> Self {
        Self {
            kind: ZoneKind::Default,
            distance: 0.0,
            length: 10.0,
            width: 1.0,
            bias: 0.0,
            factor: 1.0,
        }
    }
}

/// Both long edges of a zone ribbon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneEdges {
    /// Near edge, in centerline order.
    pub forward: Vec<Point3>,
    /// Far edge, in reverse centerline order.
    pub reverse: Vec<Point3>,
}

impl ZoneEdges {
    /// Single polygon: forward edge followed by the reversed far edge.
    pub fn into_outline(self) -> Vec<Point3> {
        let mut outline = self.forward;
        outline.extend(self.reverse);
        outline
    }
}

/// Sample `zone` every `step` units (rounded to divide the zone evenly).
///
/// At each sample the centerline point is projected onto both boundaries;
/// the near edge sits `bias * (separation - width)` from the left boundary
/// and the far edge `width` beyond it. Edge points closer than 20% of the
/// step to the last kept point are dropped.
pub fn sample_zone_edges(
    central: &dyn Curve,
    left: &dyn Curve,
    right: &dyn Curve,
    zone: &ZoneDescriptor,
    step: f64,
) -> ZoneEdges {
    let (step, sample_count) = calc_step(zone.length, step);
    let min_distance_sq = (step * 0.2).powi(2);
    log::trace!(
        "sampling {:?} zone at {:.2}+{:.2}: {} samples",
        zone.kind,
        zone.distance,
        zone.length,
        sample_count
    );

    let mut forward: Vec<Point3> = Vec::with_capacity(sample_count);
    let mut reverse: Vec<Point3> = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        let center = central.sample_point(zone.distance + i as f64 * step);
        let lp = left.project_point(center).position;
        let rp = right.project_point(center).position;

        let cross = rp - lp;
        let cross_dir = cross.normalize_or_zero();
        let bias = cross_dir * (cross.length() - zone.width) * zone.bias;
        let near = lp + bias;
        let far = lp + cross_dir * zone.width + bias;

        push_spaced(&mut forward, near, min_distance_sq);
        push_spaced(&mut reverse, far, min_distance_sq);
    }

    reverse.reverse();
    ZoneEdges { forward, reverse }
}

/// Closed outline of `zone`: see [`sample_zone_edges`].
pub fn sample_zone(
    central: &dyn Curve,
    left: &dyn Curve,
    right: &dyn Curve,
    zone: &ZoneDescriptor,
    step: f64,
) -> Vec<Point3> {
    sample_zone_edges(central, left, right, zone, step).into_outline()
}

fn push_spaced(points: &mut Vec<Point3>, point: Point3, min_distance_sq: f64) {
    match points.last() {
        Some(last) if last.distance_squared(point) <= min_distance_sq => {}
        _ => points.push(point),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatmullRomCurve;
    use approx::assert_abs_diff_eq;
    use trk_math::dvec3;

    fn lane(z: f64) -> CatmullRomCurve {
        let pts: Vec<_> = (0..=5).map(|i| dvec3(i as f64 * 4.0, 0.0, z)).collect();
        CatmullRomCurve::new(&pts, false)
    }

    #[test]
    fn test_edges_follow_boundaries() {
        let (central, left, right) = (lane(0.0), lane(-2.0), lane(2.0));
        let zone = ZoneDescriptor {
            distance: 4.0,
            length: 8.0,
            width: 1.0,
            ..ZoneDescriptor::default()
        };
        let edges = sample_zone_edges(&central, &left, &right, &zone, 2.0);
        assert_eq!(edges.forward.len(), 5);
        assert_eq!(edges.reverse.len(), 5);
        for p in &edges.forward {
            assert_abs_diff_eq!(p.z, -2.0, epsilon = 1e-6);
        }
        for p in &edges.reverse {
            assert_abs_diff_eq!(p.z, -1.0, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(edges.forward[0].x, 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(edges.reverse[0].x, 12.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bias_shifts_into_slack() {
        let (central, left, right) = (lane(0.0), lane(-2.0), lane(2.0));
        let zone = ZoneDescriptor {
            distance: 4.0,
            length: 4.0,
            width: 1.0,
            bias: 1.0,
            ..ZoneDescriptor::default()
        };
        let edges = sample_zone_edges(&central, &left, &right, &zone, 2.0);
        assert_abs_diff_eq!(edges.forward[0].z, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(edges.reverse[0].z, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_close_samples_are_decimated() {
        // The zone runs past the open end; clamped samples collapse.
        let (central, left, right) = (lane(0.0), lane(-2.0), lane(2.0));
        let zone = ZoneDescriptor {
            distance: 16.0,
            length: 8.0,
            width: 4.0,
            ..ZoneDescriptor::default()
        };
        let outline = sample_zone(&central, &left, &right, &zone, 2.0);
        // 16, 18, 20 survive on each edge; 22 and 24 clamp onto 20.
        assert_eq!(outline.len(), 6);
    }

    #[test]
    fn test_zero_length_zone_is_a_segment() {
        let (central, left, right) = (lane(0.0), lane(-2.0), lane(2.0));
        let zone = ZoneDescriptor {
            distance: 8.0,
            length: 0.0,
            width: 4.0,
            ..ZoneDescriptor::default()
        };
        let outline = sample_zone(&central, &left, &right, &zone, 2.0);
        assert_eq!(outline.len(), 2);
        assert_abs_diff_eq!(outline[0], dvec3(8.0, 0.0, -2.0), epsilon = 1e-6);
        assert_abs_diff_eq!(outline[1], dvec3(8.0, 0.0, 2.0), epsilon = 1e-6);
    }
}
