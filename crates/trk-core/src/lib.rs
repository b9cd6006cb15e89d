pub mod error;
pub mod id;
pub mod traits;
pub mod tuning;

pub use error::{Result, TrackError};
pub use id::CurveId;
pub use tuning::{CatmullRomTuning, HermiteTuning};

/// Smallest length or squared magnitude that is still safe to divide by.
pub const EPSILON: f64 = 1e-9;
