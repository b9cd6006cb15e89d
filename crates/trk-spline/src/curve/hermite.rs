//! Hermite curve through pre-baked samples.
//!
//! Each control point carries its position, a unit tangent and the
//! cumulative distance at which it sits, typically produced by resampling
//! another curve at a fixed step ([`HermiteCurve::bake`]). Projection is
//! tuned for queries that move continuously along the curve, such as a car
//! tracked from frame to frame.

use trk_core::traits::{BoundingBox, Validate};
use trk_core::{CurveId, HermiteTuning, Result, TrackError, EPSILON};
use trk_math::{Bounds3, Extent, LineSegment, Point3, Vector3};

use super::{limit_distance, CubicSegment, Curve, CurveProjection, CurveSample, SampleCache};
use crate::sampling::calc_step;

/// Most sub-chords a single segment is split into during projection.
const MAX_SUB_STEPS: usize = 256;

/// Best candidate found while projecting onto one segment.
#[derive(Debug, Clone, Copy)]
struct SegmentHit {
    extent: Extent,
    t: f64,
    position: Point3,
    direction: Vector3,
}

#[derive(Debug, Clone)]
pub struct HermiteCurve {
    id: CurveId,
    positions: Vec<Point3>,
    velocities: Vec<Vector3>,
    distances: Vec<f64>,
    closed: bool,
    tuning: HermiteTuning,
}

impl HermiteCurve {
    pub fn new(
        positions: &[Point3],
        velocities: &[Vector3],
        distances: &[f64],
        closed: bool,
    ) -> Result<Self> {
        Self::with_tuning(positions, velocities, distances, closed, HermiteTuning::default())
    }

    pub fn with_tuning(
        positions: &[Point3],
        velocities: &[Vector3],
        distances: &[f64],
        closed: bool,
        tuning: HermiteTuning,
    ) -> Result<Self> {
        let mut curve = Self {
            id: CurveId::next(),
            positions: Vec::new(),
            velocities: Vec::new(),
            distances: Vec::new(),
            closed,
            tuning,
        };
        curve.reset_data(positions, velocities, distances, closed)?;
        Ok(curve)
    }

    /// Resample `curve` every `step` units (rounded so steps divide the
    /// length evenly) into positions, unit tangents and distances.
    pub fn bake(curve: &dyn Curve, step: f64) -> Result<Self> {
        if step.is_nan() || step <= EPSILON {
            return Err(TrackError::InvalidInput(format!(
                "bake step must be positive, got {step}"
            )));
        }

        let length = curve.length();
        let (step, sample_count) = if length > EPSILON {
            calc_step(length, step)
        } else {
            (0.0, 1)
        };

        let mut positions = Vec::with_capacity(sample_count);
        let mut velocities = Vec::with_capacity(sample_count);
        let mut distances = Vec::with_capacity(sample_count);
        for i in 0..sample_count {
            let distance = (i as f64 * step).min(length);
            let sample = curve.sample(distance);
            positions.push(sample.position);
            velocities.push(sample.velocity.normalize_or_zero());
            distances.push(distance);
        }
        Self::new(&positions, &velocities, &distances, curve.is_closed())
    }

    /// Replace the curve data in place.
    ///
    /// The curve gets a fresh [`CurveId`], so every [`SampleCache`] filled
    /// from the old data goes cold.
    pub fn reset_data(
        &mut self,
        positions: &[Point3],
        velocities: &[Vector3],
        distances: &[f64],
        closed: bool,
    ) -> Result<()> {
        if positions.len() != velocities.len() || positions.len() != distances.len() {
            return Err(TrackError::MismatchedLengths {
                positions: positions.len(),
                tangents: velocities.len(),
                distances: distances.len(),
            });
        }

        self.id = CurveId::next();
        self.positions = positions.to_vec();
        self.velocities = velocities.to_vec();
        self.distances = distances.to_vec();
        self.closed = closed;

        if positions.len() < 2 {
            log::warn!("{} built from {} samples has no segments", self.id, positions.len());
        } else {
            log::debug!(
                "built {}: {} samples, length {:.3}, closed={}",
                self.id,
                positions.len(),
                self.length(),
                closed
            );
        }
        Ok(())
    }

    /// Identity tag of the current curve data.
    pub fn id(&self) -> CurveId {
        self.id
    }

    pub fn tuning(&self) -> &HermiteTuning {
        &self.tuning
    }

    pub fn velocity(&self, index: usize) -> Vector3 {
        assert!(
            index < self.velocities.len(),
            "velocity index {} out of range ({} samples)",
            index,
            self.velocities.len()
        );
        self.velocities[index]
    }

    pub fn distance_at(&self, index: usize) -> f64 {
        assert!(
            index < self.distances.len(),
            "distance index {} out of range ({} samples)",
            index,
            self.distances.len()
        );
        self.distances[index]
    }

    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Sample through a caller-owned cache.
    ///
    /// Consecutive queries on the same segment reuse its coefficients.
    pub fn sample_cached(&self, distance: f64, cache: &mut SampleCache) -> CurveSample {
        match self.positions.len() {
            0 => return CurveSample::default(),
            1 => return CurveSample::at_rest(self.positions[0]),
            _ => {}
        }

        let distance = limit_distance(distance, self.length(), self.closed);
        let segment = self.segment_for_distance(distance);
        self.fill_cache(cache, segment);
        let t = cache.local_t(distance - self.distances[segment]);
        let cubic = cache.cubic();
        CurveSample {
            position: cubic.position(t),
            velocity: cubic.velocity(t),
            acceleration: cubic.acceleration(t),
        }
    }

    fn fill_cache(&self, cache: &mut SampleCache, segment: usize) -> bool {
        cache.fill(self.id, segment, || {
            let length = self.distances[segment + 1] - self.distances[segment];
            let inv_length = if length > EPSILON { 1.0 / length } else { 0.0 };
            let cubic = CubicSegment::hermite(
                self.positions[segment],
                self.positions[segment + 1],
                self.velocities[segment] * length,
                self.velocities[segment + 1] * length,
            );
            (cubic, inv_length)
        })
    }

    fn segment_for_distance(&self, distance: f64) -> usize {
        let last = self.distances.len() - 1;
        let mut segment = 0;
        while segment < last && self.distances[segment + 1] < distance {
            segment += 1;
        }
        segment.min(last - 1)
    }

    /// Whether two segments are within `neighbor_span` of each other,
    /// counting across the seam of a closed curve.
    fn is_neighbor(&self, a: usize, b: usize) -> bool {
        let (lo, hi) = if a > b { (b, a) } else { (a, b) };
        let span = self.tuning.neighbor_span;
        if hi - lo <= span {
            return true;
        }
        let segments = self.segment_count();
        self.closed && hi + span >= segments && (hi + span) % segments >= lo
    }

    fn weighted_distance_sq(&self, a: Point3, b: Point3) -> f64 {
        let d = a - b;
        self.tuning.weighted_distance_sq(d.x, d.y, d.z)
    }

    /// Project onto the chord first; unless the chord parameter is clearly
    /// outside the segment, re-project onto sub-chords no longer than
    /// `max_sub_step` and keep the closest.
    fn project_on_segment(&self, point: Point3, segment: usize) -> SegmentHit {
        let mut start = self.positions[segment];
        let chord = LineSegment::new(start, self.positions[segment + 1]);
        let projection = chord.project(point);
        let mut hit = SegmentHit {
            extent: projection.extent,
            t: projection.t,
            position: projection.position,
            direction: chord.direction(),
        };

        let margin = self.tuning.chord_margin;
        if projection.t + margin < 0.0 || projection.t - margin > 1.0 {
            return hit;
        }

        let (step_count, step_length) = self.divide_segment(segment);
        let mut cache = SampleCache::new();
        self.fill_cache(&mut cache, segment);
        let inv_length = cache.local_t(1.0);

        let mut closest_sq = f64::MAX;
        let mut closest_step = 0;
        for i in 0..step_count {
            let end = cache.position_at((i + 1) as f64 * step_length);
            let sub_chord = LineSegment::new(start, end);
            let sub = sub_chord.project(point);
            let distance_sq = point.distance_squared(sub.position);
            if distance_sq < closest_sq {
                closest_sq = distance_sq;
                closest_step = i;
                let sub_t = sub.t.clamp(0.0, 1.0);
                hit = SegmentHit {
                    extent: sub.extent,
                    t: (i as f64 + sub_t) * step_length * inv_length,
                    position: sub.position,
                    direction: sub_chord.direction(),
                };
            }
            start = end;
        }

        // Only the outermost sub-chords can report falling off the segment.
        let off_start = hit.extent == Extent::Before && closest_step != 0;
        let off_end = hit.extent == Extent::After && closest_step != step_count - 1;
        if off_start || off_end {
            hit.extent = Extent::Inside;
        }
        hit
    }

    /// Sub-chord count and length for `segment`, at most [`MAX_SUB_STEPS`]
    /// sub-chords however long the segment is.
    fn divide_segment(&self, segment: usize) -> (usize, f64) {
        let length = self.distances[segment + 1] - self.distances[segment];
        let max_step = self.tuning.max_sub_step;
        if length > max_step {
            let steps = (length / max_step).ceil();
            let step_count = if steps < MAX_SUB_STEPS as f64 {
                steps as usize
            } else {
                MAX_SUB_STEPS
            };
            (step_count, length / step_count as f64)
        } else {
            (1, length)
        }
    }
}

/// Signed radius of curvature for a velocity/acceleration pair.
///
/// Negative when the curve turns towards negative lateral offsets. `None`
/// on a straight (zero acceleration).
pub fn turn_radius(velocity: Vector3, acceleration: Vector3) -> Option<f64> {
    let accel = acceleration.length();
    if accel <= EPSILON {
        return None;
    }
    let radius = velocity.length_squared() / accel;
    if velocity.z * acceleration.x - velocity.x * acceleration.z < 0.0 {
        Some(-radius)
    } else {
        Some(radius)
    }
}

impl Curve for HermiteCurve {
    fn length(&self) -> f64 {
        if self.distances.len() > 1 {
            self.distances[self.distances.len() - 1]
        } else {
            0.0
        }
    }

    fn point_count(&self) -> usize {
        self.positions.len()
    }

    fn segment_count(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn point(&self, index: usize) -> Point3 {
        assert!(
            index < self.positions.len(),
            "point index {} out of range ({} samples)",
            index,
            self.positions.len()
        );
        self.positions[index]
    }

    fn sample(&self, distance: f64) -> CurveSample {
        self.sample_cached(distance, &mut SampleCache::new())
    }

    /// Candidates are the sub-chord projection of every segment plus every
    /// control point; the two end points are tagged `Before`/`After`.
    ///
    /// With a valid hint, candidates more than `neighbor_span` segments away
    /// from it pay `neighbor_penalty_sq` on top of their squared distance.
    /// That keeps a tracked point from jumping across a hairpin or a lap
    /// boundary just because the other side is marginally closer.
    fn project_point_hinted(&self, point: Point3, hint: Option<usize>) -> CurveProjection {
        match self.positions.len() {
            0 => return CurveProjection::default().with_offset_of(point, Vector3::ZERO),
            1 => {
                return CurveProjection {
                    position: self.positions[0],
                    along: self.distances[0],
                    ..CurveProjection::default()
                }
                .with_offset_of(point, self.velocities[0]);
            }
            _ => {}
        }

        let segment_count = self.segment_count();
        let hint = hint.filter(|&h| h < segment_count);
        let penalized = |segment: usize, distance_sq: f64| match hint {
            Some(h) if !self.is_neighbor(segment, h) => {
                distance_sq + self.tuning.neighbor_penalty_sq
            }
            _ => distance_sq,
        };

        let mut best_score = f64::MAX;
        let mut best_segment = 0;
        let mut best = SegmentHit {
            extent: Extent::Inside,
            t: 0.0,
            position: self.positions[0],
            direction: self.velocities[0],
        };

        let first = hint.unwrap_or(0);
        let hit = self.project_on_segment(point, first);
        if hit.extent == Extent::Inside {
            best_score = self.weighted_distance_sq(point, hit.position);
            best_segment = first;
            best = hit;
        }

        for segment in (0..segment_count).filter(|&s| s != first) {
            let hit = self.project_on_segment(point, segment);
            if hit.extent != Extent::Inside {
                continue;
            }
            let score = penalized(segment, self.weighted_distance_sq(point, hit.position));
            if score < best_score {
                best_score = score;
                best_segment = segment;
                best = hit;
            }
        }

        for (index, &position) in self.positions.iter().enumerate() {
            let (segment, t, extent) = if index == 0 {
                (0, 0.0, Extent::Before)
            } else if index == segment_count {
                (index - 1, 1.0, Extent::After)
            } else {
                (index - 1, 1.0, Extent::Inside)
            };
            let score = penalized(segment, self.weighted_distance_sq(point, position));
            if score < best_score {
                best_score = score;
                best_segment = segment;
                best = SegmentHit {
                    extent,
                    t,
                    position,
                    direction: self.velocities[index],
                };
            }
        }

        debug_assert!((0.0..=1.0).contains(&best.t), "projection t out of range: {}", best.t);

        let d1 = self.distances[best_segment];
        let d2 = self.distances[best_segment + 1];
        CurveProjection {
            position: best.position,
            along: d1 + (d2 - d1) * best.t,
            segment: best_segment,
            t: best.t,
            extent: best.extent,
            ..CurveProjection::default()
        }
        .with_offset_of(point, best.direction)
    }
}

impl Validate for HermiteCurve {
    fn validate(&self) -> Result<()> {
        if let Some(i) = self.distances.iter().position(|d| !d.is_finite()) {
            return Err(TrackError::Geometry(format!("distance {i} is not finite")));
        }
        if let Some(i) = self.distances.windows(2).position(|w| w[1] < w[0]) {
            return Err(TrackError::Geometry(format!(
                "distances decrease between samples {} and {}",
                i,
                i + 1
            )));
        }
        if let Some(i) = self.positions.iter().position(|p| !p.is_finite()) {
            return Err(TrackError::Geometry(format!("position {i} is not finite")));
        }
        Ok(())
    }
}

impl BoundingBox for HermiteCurve {
    type Bounds = Bounds3;

    fn bounding_box(&self) -> Option<Bounds3> {
        Bounds3::from_points(self.positions.iter().copied())
    }
}
