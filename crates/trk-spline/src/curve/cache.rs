//! Per-query-session evaluation cache for Hermite curves.

use trk_core::CurveId;
use trk_math::Point3;

use super::CubicSegment;

/// Coefficients of the last segment a query sequence touched.
///
/// A cache belongs to one caller walking one curve; it never owns curve
/// data, only remembers which curve build (by [`CurveId`]) it was filled
/// from. A mismatching id makes the cache cold, so a cache that survives a
/// curve rebuild cannot hand out stale coefficients.
#[derive(Debug, Clone, Default)]
pub struct SampleCache {
    curve: Option<CurveId>,
    segment: Option<usize>,
    cubic: CubicSegment,
    inv_length: f64,
}

impl SampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Curve build the cache was last filled from.
    pub fn curve(&self) -> Option<CurveId> {
        self.curve
    }

    /// Segment whose coefficients are currently held.
    pub fn segment(&self) -> Option<usize> {
        self.segment
    }

    pub fn is_warm_for(&self, curve: CurveId, segment: usize) -> bool {
        self.curve == Some(curve) && self.segment == Some(segment)
    }

    /// Make sure the cache holds `segment` of `curve`, computing the
    /// coefficients and inverse segment length with `build` if it does not.
    ///
    /// Returns `true` when `build` ran.
    pub(crate) fn fill<F>(&mut self, curve: CurveId, segment: usize, build: F) -> bool
    where
        F: FnOnce() -> (CubicSegment, f64),
    {
        if self.curve != Some(curve) {
            self.curve = Some(curve);
            self.segment = None;
        }
        if self.segment == Some(segment) {
            return false;
        }
        let (cubic, inv_length) = build();
        self.segment = Some(segment);
        self.cubic = cubic;
        self.inv_length = inv_length;
        true
    }

    pub(crate) fn cubic(&self) -> &CubicSegment {
        &self.cubic
    }

    /// Segment-local parameter for a distance measured from the segment start.
    pub(crate) fn local_t(&self, distance_on_segment: f64) -> f64 {
        distance_on_segment * self.inv_length
    }

    pub(crate) fn position_at(&self, distance_on_segment: f64) -> Point3 {
        self.cubic.position(self.local_t(distance_on_segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> (CubicSegment, f64) {
        (CubicSegment::default(), 0.5)
    }

    #[test]
    fn test_fill_only_recomputes_on_change() {
        let id = CurveId::next();
        let mut cache = SampleCache::new();
        assert!(cache.fill(id, 3, build));
        assert!(!cache.fill(id, 3, build));
        assert!(cache.fill(id, 4, build));
        assert!(cache.is_warm_for(id, 4));
        assert_eq!(cache.local_t(4.0), 2.0);
    }

    #[test]
    fn test_identity_mismatch_goes_cold() {
        let first = CurveId::next();
        let second = CurveId::next();
        let mut cache = SampleCache::new();
        cache.fill(first, 0, build);
        assert!(!cache.is_warm_for(second, 0));
        assert!(cache.fill(second, 0, build));
        assert_eq!(cache.curve(), Some(second));
    }

    #[test]
    fn test_reset() {
        let id = CurveId::next();
        let mut cache = SampleCache::new();
        cache.fill(id, 1, build);
        cache.reset();
        assert_eq!(cache.segment(), None);
        assert_eq!(cache.curve(), None);
    }
}
