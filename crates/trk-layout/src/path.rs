//! Three-lane path: the authored control points of a track.

use serde::{Deserialize, Serialize};
use trk_math::{dvec3, Point3, Vector3};
use trk_spline::{CatmullRomCurve, Curve};

use crate::splice;

/// Which of the three point sets of a [`PathData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneKind {
    Left,
    Central,
    Right,
}

/// Control points of the left boundary, centerline and right boundary.
///
/// The three sets are edited in lock-step: the i-th points of each lane
/// describe the same cross-section of the track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub central: Vec<Point3>,
    pub left: Vec<Point3>,
    pub right: Vec<Point3>,
    pub closed: bool,
}

impl PathData {
    pub fn new(central: Vec<Point3>, left: Vec<Point3>, right: Vec<Point3>, closed: bool) -> Self {
        Self {
            central,
            left,
            right,
            closed,
        }
    }

    /// Lay both boundaries `width` units either side of `central`.
    ///
    /// Each point is pushed along the horizontal normal of the segment that
    /// leaves it, or the one that arrives at it for the last point. Without
    /// `ccw` the left boundary lies on the +Z side of a track heading +X;
    /// `ccw` swaps the sides. Points with no usable direction get both
    /// boundaries on the centerline.
    pub fn from_centerline(central: &[Point3], width: f64, ccw: bool, closed: bool) -> Self {
        let last = central.len().saturating_sub(1);
        let (left, right) = central
            .iter()
            .enumerate()
            .map(|(i, &point)| {
                let direction = if i < last {
                    central[i + 1] - point
                } else if i > 0 {
                    point - central[i - 1]
                } else {
                    Vector3::ZERO
                };
                let mut normal = dvec3(direction.z, 0.0, -direction.x).normalize_or_zero() * width;
                if ccw {
                    normal = -normal;
                }
                (point - normal, point + normal)
            })
            .unzip();
        log::debug!("placed lanes around {} centerline points, width {width}", central.len());
        Self::new(central.to_vec(), left, right, closed)
    }

    pub fn points(&self, lane: LaneKind) -> &[Point3] {
        match lane {
            LaneKind::Left => &self.left,
            LaneKind::Central => &self.central,
            LaneKind::Right => &self.right,
        }
    }

    /// Number of cross-sections; the shortest lane wins if they disagree.
    pub fn len(&self) -> usize {
        self.central.len().min(self.left.len()).min(self.right.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn build_curve(&self, lane: LaneKind) -> CatmullRomCurve {
        CatmullRomCurve::new(self.points(lane), self.closed)
    }

    /// Insert a cross-section through `point`.
    ///
    /// `point` becomes the new centerline point; the boundary points are its
    /// projections onto the current left and right lanes. The cross-section
    /// goes right after the centerline segment nearest to `point`. Returns
    /// the index of the new cross-section.
    pub fn insert_point(&mut self, point: Point3) -> usize {
        let left = self.build_curve(LaneKind::Left);
        let right = self.build_curve(LaneKind::Right);
        let left_point = left.sample_point(left.project_point(point).along);
        let right_point = right.sample_point(right.project_point(point).along);

        let nearest = self.build_curve(LaneKind::Central).find_nearest(point, 0);
        let index = nearest.segment as isize + 1;

        self.left = splice::insert(&self.left, index, left_point);
        self.central = splice::insert(&self.central, index, point);
        self.right = splice::insert(&self.right, index, right_point);
        log::debug!("inserted path point {} at {:?}", index, point);
        index.min(self.central.len() as isize - 1) as usize
    }

    /// Remove cross-section `index` from all three lanes. Out-of-range
    /// indices leave the path untouched.
    pub fn remove_point(&mut self, index: usize) {
        let index = isize::try_from(index).unwrap_or(isize::MAX);
        self.left = splice::remove_at(&self.left, index);
        self.central = splice::remove_at(&self.central, index);
        self.right = splice::remove_at(&self.right, index);
        log::debug!("removed path point {}", index);
    }

    /// Centerline control point an editor would pick for `point`: the start
    /// of the nearest segment, or its end when `point` is past the middle.
    pub fn nearest_point_index(&self, point: Point3) -> Option<usize> {
        let curve = self.build_curve(LaneKind::Central);
        let count = curve.point_count();
        if count == 0 {
            return None;
        }
        let nearest = curve.find_nearest(point, 0);
        let mut index = nearest.segment;
        if nearest.t > 0.5 && index + 1 < count {
            index += 1;
        }
        Some(index)
    }

    /// [`nearest_point_index`](Self::nearest_point_index), but only when
    /// `point` lies within `radius` of that control point.
    pub fn pick_point(&self, point: Point3, radius: f64) -> Option<usize> {
        self.nearest_point_index(point)
            .filter(|&i| self.central[i].distance_squared(point) < radius * radius)
    }
}
