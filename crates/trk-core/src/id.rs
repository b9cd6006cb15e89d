use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CURVE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity tag handed out every time a curve is (re)built.
///
/// Evaluation caches remember the tag of the curve they were filled from and
/// go cold when it no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CurveId(u64);

impl CurveId {
    pub fn next() -> Self {
        Self(NEXT_CURVE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CurveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "curve#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = CurveId::next();
        let b = CurveId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }
}
