pub mod bounds;
pub mod segment;

pub use glam::{dvec3, DVec3};
pub use bounds::Bounds3;
pub use segment::{ChordProjection, Extent, LineSegment};

pub type Point3 = DVec3;
pub type Vector3 = DVec3;

/// Y component of `a × b`, the only one that matters for left/right tests on
/// a Y-up track.
pub fn horizontal_cross(a: Vector3, b: Vector3) -> f64 {
    a.z * b.x - a.x * b.z
}
