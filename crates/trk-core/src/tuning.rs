//! Tuned search constants for the curve types.
//!
//! The defaults are the values the track tooling has always shipped with.
//! They are empirical; tests pin them rather than derive them.

use serde::{Deserialize, Serialize};

/// Construction and nearest-point search parameters for Catmull-Rom curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatmullRomTuning {
    /// A closed curve whose first and last points are closer than this
    /// (squared) treats the last point as a duplicate of the first.
    pub closure_distance_sq: f64,
    /// Weight of squared X/Z error in the coarse chord scan.
    pub horizontal_weight: f64,
    /// Weight of squared Y error in the coarse chord scan.
    pub vertical_weight: f64,
    /// Newton steps per seed parameter during refinement.
    pub refine_iterations: usize,
    /// Geometric damping applied to the step bound every iteration.
    pub refine_damping: f64,
}

impl CatmullRomTuning {
    pub const DEFAULT_CLOSURE_DISTANCE_SQ: f64 = 0.01;
    pub const DEFAULT_VERTICAL_WEIGHT: f64 = 100.0;

    /// Scale applied to a squared offset before comparing chord candidates.
    pub fn weighted_distance_sq(&self, dx: f64, dy: f64, dz: f64) -> f64 {
        (dx * dx + dz * dz) * self.horizontal_weight + dy * dy * self.vertical_weight
    }
}

impl Default for CatmullRomTuning {
    fn default() -> Self {
        Self {
            closure_distance_sq: Self::DEFAULT_CLOSURE_DISTANCE_SQ,
            horizontal_weight: 1.0,
            vertical_weight: Self::DEFAULT_VERTICAL_WEIGHT,
            refine_iterations: 3,
            refine_damping: 0.75,
        }
    }
}

/// Projection parameters for Hermite sample curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HermiteTuning {
    /// Added to the squared distance of candidates outside the hint's
    /// neighborhood.
    pub neighbor_penalty_sq: f64,
    /// Segments at most this far from the hint are neighbors.
    pub neighbor_span: usize,
    /// Weight of squared Y error when ranking candidates.
    pub vertical_weight: f64,
    /// Chord parameters within `[-margin, 1 + margin]` get sub-chord refinement.
    pub chord_margin: f64,
    /// Longest sub-chord used during refinement.
    pub max_sub_step: f64,
}

impl HermiteTuning {
    pub const DEFAULT_NEIGHBOR_PENALTY_SQ: f64 = 25.0 * 25.0;

    pub fn weighted_distance_sq(&self, dx: f64, dy: f64, dz: f64) -> f64 {
        dx * dx + dz * dz + dy * dy * self.vertical_weight
    }
}

impl Default for HermiteTuning {
    fn default() -> Self {
        Self {
            neighbor_penalty_sq: Self::DEFAULT_NEIGHBOR_PENALTY_SQ,
            neighbor_span: 2,
            vertical_weight: 10.0,
            chord_margin: 0.2,
            max_sub_step: 10.0,
        }
    }
}
