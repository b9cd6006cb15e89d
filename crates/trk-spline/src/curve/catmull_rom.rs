//! Catmull-Rom path curve through authored control points.

use serde::{Deserialize, Serialize};
use trk_core::traits::{BoundingBox, Validate};
use trk_core::{CatmullRomTuning, Result, TrackError, EPSILON};
use trk_math::{Bounds3, Extent, LineSegment, Point3, Vector3};

use super::{limit_distance, CubicSegment, Curve, CurveProjection, CurveSample};

/// Raw result of [`CatmullRomCurve::find_nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    pub segment: usize,
    pub t: f64,
    pub position: Point3,
    /// `query - position`.
    pub delta: Vector3,
    pub distance_sq: f64,
}

/// Smooth curve interpolating an ordered list of control points.
///
/// One uniform Catmull-Rom segment per consecutive point pair; a closed curve
/// gets an extra segment back to the first point. Segment lengths come from
/// Gauss-Legendre quadrature and distance queries map linearly onto each
/// segment's parameter, which is accurate to editor precision only.
///
/// Fewer than two usable points produce an empty curve: zero length, and
/// every query answers with the single remaining point (or the origin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatmullRomCurve {
    segments: Vec<CubicSegment>,
    lengths: Vec<f64>,
    total_length: f64,
    end_point: Point3,
    point_count: usize,
    closed: bool,
    tuning: CatmullRomTuning,
}

impl CatmullRomCurve {
    pub fn new(points: &[Point3], closed: bool) -> Self {
        Self::with_tuning(points, closed, CatmullRomTuning::default())
    }

    pub fn with_tuning(points: &[Point3], closed: bool, tuning: CatmullRomTuning) -> Self {
        let mut curve = Self {
            segments: Vec::new(),
            lengths: Vec::new(),
            total_length: 0.0,
            end_point: points.first().copied().unwrap_or(Point3::ZERO),
            point_count: points.len().min(1),
            closed,
            tuning,
        };

        let n = points.len();
        if n < 2 {
            log::warn!("catmull-rom curve needs at least 2 points, got {n}");
            return curve;
        }

        let segment_count = if closed {
            let duplicate_end =
                points[0].distance_squared(points[n - 1]) < tuning.closure_distance_sq;
            let usable = if duplicate_end { n - 1 } else { n };
            if usable < 2 {
                log::warn!("closed catmull-rom curve collapses to a single point");
                return curve;
            }
            curve.end_point = points[0];
            curve.point_count = usable;
            usable
        } else {
            curve.end_point = points[n - 1];
            curve.point_count = n;
            n - 1
        };

        curve.segments.reserve(segment_count);
        curve.lengths.reserve(segment_count);
        for current in 0..segment_count {
            let (previous, start, end, next) = if closed {
                let previous = if current == 0 { segment_count - 1 } else { current - 1 };
                let end = if current == segment_count - 1 { 0 } else { current + 1 };
                let next = if end == segment_count - 1 { 0 } else { end + 1 };
                (previous, current, end, next)
            } else {
                let previous = current.saturating_sub(1);
                let end = current + 1;
                let next = if end == segment_count { end } else { end + 1 };
                (previous, current, end, next)
            };

            let segment = CubicSegment::catmull_rom(
                points[previous],
                points[start],
                points[end],
                points[next],
            );
            let length = segment.arc_length();
            curve.total_length += length;
            curve.segments.push(segment);
            curve.lengths.push(length);
        }

        log::debug!(
            "built catmull-rom curve: {} segments, length {:.3}, closed={}",
            segment_count,
            curve.total_length,
            closed
        );
        curve
    }

    pub fn tuning(&self) -> &CatmullRomTuning {
        &self.tuning
    }

    /// Arc length of one segment.
    pub fn segment_length(&self, index: usize) -> f64 {
        self.lengths[index]
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    /// Evaluate segment `index` at its raw parameter `t`.
    pub fn segment_sample(&self, index: usize, t: f64) -> CurveSample {
        let segment = &self.segments[index];
        CurveSample {
            position: segment.position(t),
            velocity: segment.velocity(t),
            acceleration: segment.acceleration(t),
        }
    }

    /// Segment containing `distance` (already limited) and the distance at
    /// which that segment starts.
    fn locate(&self, distance: f64) -> (usize, f64) {
        let mut covered = 0.0;
        for (index, &length) in self.lengths.iter().enumerate() {
            if distance < covered + length {
                return (index, covered);
            }
            covered += length;
        }
        let last = self.lengths.len() - 1;
        (last, covered - self.lengths[last])
    }

    fn distance_to_segment(&self, index: usize) -> f64 {
        self.lengths[..index].iter().sum()
    }

    /// Two-phase nearest point search.
    ///
    /// The coarse pass measures every chord from `from_segment` onwards with
    /// the anisotropic weights of [`CatmullRomTuning`], so vertical error
    /// counts much more than horizontal error. The fine pass runs a damped
    /// Newton refinement on the best chord's segment and its two neighbors.
    /// The result is locally optimal; it assumes the query is near the curve.
    pub fn find_nearest(&self, point: Point3, from_segment: usize) -> NearestPoint {
        let n = self.segments.len();
        if n == 0 {
            let delta = point - self.end_point;
            return NearestPoint {
                segment: 0,
                t: 0.0,
                position: self.end_point,
                delta,
                distance_sq: delta.length_squared(),
            };
        }

        let mut closest_chord = 0;
        let mut min_distance_sq = f64::MAX;
        for i in from_segment.min(n)..n {
            let chord = LineSegment::new(self.point(i), self.point(i + 1));
            let d = chord.closest_point(point) - point;
            let distance_sq = self.tuning.weighted_distance_sq(d.x, d.y, d.z);
            if distance_sq < min_distance_sq {
                min_distance_sq = distance_sq;
                closest_chord = i;
            }
        }

        let wrap =
            |offset: isize| (closest_chord as isize + offset).rem_euclid(n as isize) as usize;
        let mut best = self.nearest_on_segment(point, wrap(-1));
        for offset in [0, 1] {
            let candidate = self.nearest_on_segment(point, wrap(offset));
            if candidate.distance_sq < best.distance_sq {
                best = candidate;
            }
        }
        best
    }

    /// Refine from three seeds (start, middle, end) and keep the closest.
    fn nearest_on_segment(&self, point: Point3, index: usize) -> NearestPoint {
        let segment = &self.segments[index];
        let evaluate = |seed: f64| {
            let t = self.refine(point, segment, seed);
            let position = segment.position(t);
            let delta = point - position;
            NearestPoint {
                segment: index,
                t,
                position,
                delta,
                distance_sq: delta.length_squared(),
            }
        };
        let mut best = evaluate(0.0);
        for seed in [0.5, 1.0] {
            let candidate = evaluate(seed);
            if candidate.distance_sq < best.distance_sq {
                best = candidate;
            }
        }
        best
    }

    /// Damped Newton iteration on the segment parameter.
    ///
    /// Every step moves `t` by the tangential component of the position
    /// error, bounded by the previous step scaled by `refine_damping`.
    fn refine(&self, point: Point3, segment: &CubicSegment, seed: f64) -> f64 {
        let mut t = seed;
        let mut bound = 1.0;
        let mut position = segment.position(t);
        for _ in 0..self.tuning.refine_iterations {
            let tangent = segment.velocity(t);
            let tangent_sq = tangent.length_squared();
            let step = if tangent_sq > EPSILON {
                tangent.dot(point - position) / tangent_sq
            } else {
                0.0
            };
            bound *= self.tuning.refine_damping;
            let step = step.clamp(-bound, bound);
            t = (t + step).clamp(0.0, 1.0);
            bound = step.abs();
            position = segment.position(t);
        }
        t
    }

    /// Open curves report queries beyond either end as `Before`/`After`.
    fn extent_of(&self, nearest: &NearestPoint, tangent: Vector3) -> Extent {
        if self.closed {
            return Extent::Inside;
        }
        let ahead = nearest.delta.dot(tangent);
        if nearest.segment == 0 && nearest.t <= 0.0 && ahead < 0.0 {
            Extent::Before
        } else if nearest.segment + 1 == self.segments.len() && nearest.t >= 1.0 && ahead > 0.0 {
            Extent::After
        } else {
            Extent::Inside
        }
    }
}

impl Curve for CatmullRomCurve {
    fn length(&self) -> f64 {
        self.total_length
    }

    fn point_count(&self) -> usize {
        self.point_count
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    /// Start point of segment `index`; `index == segment_count()` is the end
    /// point (the first point again on a closed curve).
    fn point(&self, index: usize) -> Point3 {
        assert!(
            index <= self.segments.len(),
            "point index {} out of range for curve with {} segments",
            index,
            self.segments.len()
        );
        match self.segments.get(index) {
            Some(segment) => segment.a,
            None => self.end_point,
        }
    }

    fn sample(&self, distance: f64) -> CurveSample {
        if self.segments.is_empty() {
            return CurveSample::at_rest(self.end_point);
        }
        let distance = limit_distance(distance, self.total_length, self.closed);
        let (index, start) = self.locate(distance);
        let length = self.lengths[index];
        let t = if length > EPSILON {
            ((distance - start) / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.segment_sample(index, t)
    }

    /// The hint, when given, is where the coarse chord scan starts.
    fn project_point_hinted(&self, point: Point3, hint: Option<usize>) -> CurveProjection {
        if self.segments.is_empty() {
            return CurveProjection {
                position: self.end_point,
                ..CurveProjection::default()
            }
            .with_offset_of(point, Vector3::ZERO);
        }

        let nearest = self.find_nearest(point, hint.unwrap_or(0));
        let tangent = self.segments[nearest.segment].velocity(nearest.t);
        CurveProjection {
            position: nearest.position,
            along: self.distance_to_segment(nearest.segment)
                + self.lengths[nearest.segment] * nearest.t,
            segment: nearest.segment,
            t: nearest.t,
            extent: self.extent_of(&nearest, tangent),
            ..CurveProjection::default()
        }
        .with_offset_of(point, tangent)
    }
}

impl Validate for CatmullRomCurve {
    fn validate(&self) -> Result<()> {
        if let Some(bad) = self.lengths.iter().position(|l| !l.is_finite() || *l < 0.0) {
            return Err(TrackError::Geometry(format!(
                "segment {} has invalid length {}",
                bad, self.lengths[bad]
            )));
        }
        let sum: f64 = self.lengths.iter().sum();
        if (sum - self.total_length).abs() > 1e-6 * self.total_length.max(1.0) {
            return Err(TrackError::Geometry(format!(
                "segment lengths sum to {sum}, total length is {}",
                self.total_length
            )));
        }
        Ok(())
    }
}

impl BoundingBox for CatmullRomCurve {
    type Bounds = Bounds3;

    fn bounding_box(&self) -> Option<Bounds3> {
        Bounds3::from_points((0..self.point_count).map(|i| self.point(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use trk_math::dvec3;

    fn straight(len: f64) -> CatmullRomCurve {
        let pts: Vec<_> = (0..=4).map(|i| dvec3(len * i as f64 / 4.0, 0.0, 0.0)).collect();
        CatmullRomCurve::new(&pts, false)
    }

    fn square_loop() -> Vec<Point3> {
        vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(20.0, 0.0, 0.0),
            dvec3(20.0, 0.0, 20.0),
            dvec3(0.0, 0.0, 20.0),
        ]
    }

    #[test]
    fn test_open_segment_count_and_points() {
        let curve = straight(8.0);
        assert_eq!(curve.segment_count(), 4);
        assert_eq!(curve.point_count(), 5);
        assert_eq!(curve.point(4), dvec3(8.0, 0.0, 0.0));
        assert_abs_diff_eq!(curve.point(1), dvec3(2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_straight_line_length() {
        let curve = straight(8.0);
        // Collinear points keep every segment on the line, only the speed
        // varies on the clamped end segments.
        assert_relative_eq!(curve.length(), 8.0, epsilon = 1e-9);
        curve.validate().unwrap();
    }

    #[test]
    fn test_closed_duplicate_end_is_dropped() {
        let mut pts = square_loop();
        pts.push(dvec3(0.0, 0.0, 0.05));
        let curve = CatmullRomCurve::new(&pts, true);
        assert_eq!(curve.segment_count(), 4);
        assert_eq!(curve.point(4), pts[0]);

        let without = CatmullRomCurve::new(&square_loop(), true);
        assert_eq!(without.segment_count(), 4);
        assert_relative_eq!(curve.length(), without.length(), epsilon = 1e-9);
    }

    #[test]
    fn test_closed_without_duplicate_adds_closing_segment() {
        let curve = CatmullRomCurve::new(&square_loop(), true);
        assert_eq!(curve.point_count(), 4);
        let open = CatmullRomCurve::new(&square_loop(), false);
        assert_eq!(open.segment_count(), 3);
        assert!(curve.length() > open.length());
    }

    #[test]
    fn test_closed_pair_collapsing_to_one_point_is_degenerate() {
        let pts = [dvec3(1.0, 0.0, 1.0), dvec3(1.0, 0.0, 1.05)];
        let curve = CatmullRomCurve::new(&pts, true);
        assert_eq!(curve.segment_count(), 0);
        assert_eq!(curve.length(), 0.0);
        assert_eq!(curve.sample_point(3.0), pts[0]);
    }

    #[test]
    fn test_sample_velocity_and_acceleration() {
        let curve = CatmullRomCurve::new(&square_loop(), true);
        let s = curve.sample(curve.length() * 0.125);
        assert!(s.velocity.length() > 0.0);
        assert!(s.acceleration.is_finite());
    }

    #[test]
    fn test_find_nearest_on_straight() {
        let curve = straight(8.0);
        let nearest = curve.find_nearest(dvec3(3.0, 0.0, 1.5), 0);
        assert_abs_diff_eq!(nearest.position.x, 3.0, epsilon = 0.05);
        assert_abs_diff_eq!(nearest.distance_sq, 2.25, epsilon = 0.05);
        assert_eq!(nearest.segment, 1);
    }

    #[test]
    fn test_projection_sign_and_along() {
        let curve = straight(8.0);
        let left = curve.project_point(dvec3(4.0, 0.0, 2.0));
        let right = curve.project_point(dvec3(4.0, 0.0, -2.0));
        assert_abs_diff_eq!(left.across, -2.0, epsilon = 0.05);
        assert_abs_diff_eq!(right.across, 2.0, epsilon = 0.05);
        assert_abs_diff_eq!(left.along, curve.length() * 0.5, epsilon = 0.1);
        assert_abs_diff_eq!(left.direction, dvec3(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_eq!(left.extent, Extent::Inside);
    }

    #[test]
    fn test_open_projection_beyond_ends() {
        let curve = straight(8.0);
        assert_eq!(curve.project_point(dvec3(-3.0, 0.0, 0.0)).extent, Extent::Before);
        assert_eq!(curve.project_point(dvec3(11.0, 0.0, 0.0)).extent, Extent::After);
    }

    #[test]
    fn test_hinted_scan_skips_earlier_segments() {
        let curve = straight(8.0);
        let query = dvec3(0.5, 0.0, 0.2);
        assert_eq!(curve.project_point(query).segment, 0);
        // Chords before the hint are never scanned, so the search window
        // is segments 1..=3 and the best it can do is the start of segment 1.
        let hinted = curve.project_point_hinted(query, Some(2));
        assert_eq!(hinted.segment, 1);
        assert_abs_diff_eq!(hinted.position, dvec3(2.0, 0.0, 0.0), epsilon = 1e-9);
    }

    /// Out along z = 3 at ground level, back along z = 0 one unit up.
    fn stacked_hairpin() -> Vec<Point3> {
        vec![
            dvec3(0.0, 0.0, 3.0),
            dvec3(10.0, 0.0, 3.0),
            dvec3(20.0, 0.0, 3.0),
            dvec3(30.0, 0.0, 3.0),
            dvec3(40.0, 0.0, 1.5),
            dvec3(30.0, 1.0, 0.0),
            dvec3(20.0, 1.0, 0.0),
            dvec3(10.0, 1.0, 0.0),
            dvec3(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_vertical_weight_picks_the_strand() {
        let query = dvec3(15.0, 0.0, 0.0);

        // One unit of height costs more than three units sideways.
        let weighted = CatmullRomCurve::new(&stacked_hairpin(), false);
        let nearest = weighted.find_nearest(query, 0);
        assert_eq!(nearest.segment, 1);
        assert_abs_diff_eq!(nearest.t, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(nearest.position, dvec3(15.0, 0.0, 3.0), epsilon = 1e-6);

        let tuning = CatmullRomTuning {
            vertical_weight: 1.0,
            ..CatmullRomTuning::default()
        };
        let flat = CatmullRomCurve::with_tuning(&stacked_hairpin(), false, tuning);
        assert_eq!(flat.tuning().vertical_weight, 1.0);
        let nearest = flat.find_nearest(query, 0);
        assert_eq!(nearest.segment, 6);
        assert_abs_diff_eq!(nearest.position, dvec3(15.0, 1.0, 0.0), epsilon = 1e-6);
        assert_abs_diff_eq!(nearest.distance_sq, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounding_box() {
        let curve = CatmullRomCurve::new(&square_loop(), true);
        let bounds = curve.bounding_box().unwrap();
        assert_eq!(bounds.min, Point3::ZERO);
        assert_eq!(bounds.max, dvec3(20.0, 0.0, 20.0));
        assert!(CatmullRomCurve::new(&[], false).bounding_box().is_none());
    }
}
