//! Fixed-order Gauss-Legendre quadrature used for segment arc length.

/// Five-point Gauss-Legendre table on `[-1, 1]` as `(abscissa, weight)`.
pub const GAUSS_LEGENDRE_5: [(f64, f64); 5] = [
    (0.0, 0.568_888_888_888_888_9),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (-0.906_179_845_938_664, 0.236_926_885_056_189_1),
    (0.906_179_845_938_664, 0.236_926_885_056_189_1),
];

/// Integrate `f` over `[0, 1]`.
///
/// Exact for polynomials up to degree nine.
pub fn integrate_unit<F>(f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let sum: f64 = GAUSS_LEGENDRE_5
        .iter()
        .map(|&(x, w)| f(0.5 * (1.0 + x)) * w)
        .sum();
    // [-1, 1] -> [0, 1] halves the measure.
    sum * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_sum_to_interval_length() {
        let total: f64 = GAUSS_LEGENDRE_5.iter().map(|&(_, w)| w).sum();
        assert_relative_eq!(total, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_and_polynomials() {
        assert_relative_eq!(integrate_unit(|_| 3.0), 3.0, epsilon = 1e-12);
        assert_relative_eq!(integrate_unit(|t| t), 0.5, epsilon = 1e-12);
        assert_relative_eq!(integrate_unit(|t| t.powi(4)), 0.2, epsilon = 1e-12);
        assert_relative_eq!(integrate_unit(|t| t.powi(9)), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_function_is_close() {
        // Quarter circle of radius 1 traced by (cos, sin) at angular speed PI/2.
        let speed = std::f64::consts::FRAC_PI_2;
        assert_relative_eq!(integrate_unit(|_| speed), speed, epsilon = 1e-12);
        let arc = integrate_unit(|t| (1.0 + t * t).sqrt());
        assert_relative_eq!(arc, 1.147_793_574_696_319, epsilon = 1e-6);
    }
}
