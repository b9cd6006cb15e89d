//! Track layout curves: arc-length parameterized splines, point projection,
//! and ribbon sampling between boundary curves.

pub mod curve;
pub mod quadrature;
pub mod ribbon;
pub mod sampling;

pub use curve::{
    CatmullRomCurve, CubicSegment, Curve, CurveProjection, CurveSample, HermiteCurve,
    NearestPoint, SampleCache,
};
pub use ribbon::{sample_zone, sample_zone_edges, ZoneDescriptor, ZoneEdges, ZoneKind};
pub use sampling::{calc_step, sample_polyline};
