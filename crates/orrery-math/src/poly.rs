//! Polynomial evaluation for body orientation and ephemeris models.

/// Evaluate a polynomial with coefficients in ascending-power order
/// (`coeffs[0] + coeffs[1] * x + ...`) using Horner's method.
///
/// An empty coefficient slice evaluates to zero.
pub fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluate a Chebyshev series on `x` in `[-1, 1]` via the three-term
/// recurrence `T_{k+1}(x) = 2x T_k(x) - T_{k-1}(x)`.
///
/// Ephemeris trajectories store one such series per sub-interval and
/// Cartesian component.
pub fn chebyshev(coeffs: &[f64], x: f64) -> f64 {
    let mut sum = 0.0;
    let mut t_prev = 1.0;
    let mut t_curr = x;
    for (k, &c) in coeffs.iter().enumerate() {
        match k {
            0 => sum += c,
            1 => sum += c * x,
            _ => {
                let t_next = 2.0 * x * t_curr - t_prev;
                t_prev = t_curr;
                t_curr = t_next;
                sum += c * t_curr;
            }
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horner_matches_direct_evaluation() {
        let coeffs = [3.0, -2.0, 0.5, 1.25];
        let x = 1.7;
        let direct = 3.0 - 2.0 * x + 0.5 * x * x + 1.25 * x * x * x;
        assert!((horner(&coeffs, x) - direct).abs() < 1e-12);
    }

    #[test]
    fn test_horner_empty_is_zero() {
        assert_eq!(horner(&[], 42.0), 0.0);
    }

    #[test]
    fn test_horner_constant() {
        assert_eq!(horner(&[7.5], -3.0), 7.5);
    }

    #[test]
    fn test_chebyshev_low_orders() {
        // T0 = 1, T1 = x, T2 = 2x^2 - 1, T3 = 4x^3 - 3x.
        let x = 0.37;
        assert!((chebyshev(&[1.0], x) - 1.0).abs() < 1e-12);
        assert!((chebyshev(&[0.0, 1.0], x) - x).abs() < 1e-12);
        assert!((chebyshev(&[0.0, 0.0, 1.0], x) - (2.0 * x * x - 1.0)).abs() < 1e-12);
        assert!(
            (chebyshev(&[0.0, 0.0, 0.0, 1.0], x) - (4.0 * x * x * x - 3.0 * x)).abs() < 1e-12
        );
    }

    #[test]
    fn test_chebyshev_linear_combination() {
        let coeffs = [0.5, -1.0, 2.0];
        let x = -0.8;
        let expected = 0.5 - 1.0 * x + 2.0 * (2.0 * x * x - 1.0);
        assert!((chebyshev(&coeffs, x) - expected).abs() < 1e-12);
    }
}
