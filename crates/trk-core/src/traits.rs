use crate::error::Result;

/// Check the internal consistency of a built curve or layout.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Axis-aligned bounds of an entity; `None` when it has no points.
pub trait BoundingBox {
    type Bounds;
    fn bounding_box(&self) -> Option<Self::Bounds>;
}
