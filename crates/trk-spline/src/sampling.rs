//! Uniform distance sampling of curves.

use trk_core::EPSILON;
use trk_math::Point3;

use crate::curve::Curve;

/// Upper bound on the steps a single [`calc_step`] call hands out.
pub const MAX_STEP_COUNT: usize = 1 << 16;

/// Split `length` into equal steps no longer than `desired_step`.
///
/// Returns the actual step (signed like `length`) and the number of samples
/// needed to cover both ends, which is always at least two. The step count
/// is capped at [`MAX_STEP_COUNT`]; past that the steps grow longer than
/// asked for.
pub fn calc_step(length: f64, desired_step: f64) -> (f64, usize) {
    let desired = desired_step.abs();
    let step_count = if desired > EPSILON && length.is_finite() {
        let ratio = (length.abs() / desired).ceil();
        if ratio >= MAX_STEP_COUNT as f64 {
            log::warn!("{length} / {desired} needs {ratio} steps, capping at {MAX_STEP_COUNT}");
            MAX_STEP_COUNT
        } else {
            (ratio as usize).max(1)
        }
    } else {
        1
    };
    (length / step_count as f64, step_count + 1)
}

/// Positions every `desired_step` units along `curve`, both ends included.
pub fn sample_polyline(curve: &dyn Curve, desired_step: f64) -> Vec<Point3> {
    let length = curve.length();
    let (step, sample_count) = calc_step(length, desired_step);
    log::trace!("sampling polyline: {sample_count} samples, step {step:.3}");
    (0..sample_count)
        .map(|i| curve.sample_point((i as f64 * step).min(length)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatmullRomCurve;
    use approx::assert_abs_diff_eq;
    use trk_math::dvec3;

    #[test]
    fn test_calc_step_rounds_up() {
        assert_eq!(calc_step(10.0, 3.0), (2.5, 5));
        assert_eq!(calc_step(9.0, 3.0), (3.0, 4));
        assert_eq!(calc_step(1.0, 5.0), (1.0, 2));
    }

    #[test]
    fn test_calc_step_keeps_sign() {
        let (step, samples) = calc_step(-10.0, 4.0);
        assert_eq!(samples, 4);
        assert_abs_diff_eq!(step, -10.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_calc_step_degenerate_inputs() {
        assert_eq!(calc_step(0.0, 1.0), (0.0, 2));
        assert_eq!(calc_step(5.0, 0.0), (5.0, 2));
    }

    #[test]
    fn test_calc_step_caps_huge_ratios() {
        let (step, samples) = calc_step(1e25, 1e-3);
        assert_eq!(samples, MAX_STEP_COUNT + 1);
        assert_abs_diff_eq!(step, 1e25 / MAX_STEP_COUNT as f64, epsilon = 1.0);

        let (step, samples) = calc_step(-1e300, f64::MIN_POSITIVE.sqrt());
        assert_eq!(samples, MAX_STEP_COUNT + 1);
        assert!(step.is_finite() && step < 0.0);
    }

    #[test]
    fn test_sample_polyline_straight() {
        let pts: Vec<_> = (0..5).map(|i| dvec3(i as f64 * 2.0, 0.0, 0.0)).collect();
        let curve = CatmullRomCurve::new(&pts, false);
        let samples = sample_polyline(&curve, 3.0);
        assert_eq!(samples.len(), 4);
        assert_abs_diff_eq!(samples[0], pts[0], epsilon = 1e-9);
        assert_abs_diff_eq!(samples[3], pts[4], epsilon = 1e-9);
    }
}
