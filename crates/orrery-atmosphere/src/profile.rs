//! Normalized density profiles, dimensionless in `[0, 1]`.

/// Exponential falloff with the given scale height.
///
/// Altitudes below the surface clamp to sea level instead of blowing
/// up; rays can dip fractionally below zero altitude from quadrature
/// placement alone.
pub fn exponential_density(altitude: f64, scale_height: f64) -> f64 {
    (-altitude.max(0.0) / scale_height).exp()
}

/// Triangular profile: zero at `lower` and `upper`, one at `mode`.
///
/// A degenerate layer (`upper <= lower`) contributes nothing anywhere.
pub fn triangular_density(altitude: f64, lower: f64, mode: f64, upper: f64) -> f64 {
    if upper <= lower || altitude <= lower || altitude >= upper {
        return 0.0;
    }
    if altitude < mode {
        if mode > lower {
            (altitude - lower) / (mode - lower)
        } else {
            1.0
        }
    } else if upper > mode {
        (upper - altitude) / (upper - mode)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_clamps_below_surface() {
        assert_eq!(exponential_density(-500.0, 8_000.0), 1.0);
        assert_eq!(exponential_density(0.0, 8_000.0), 1.0);
    }

    #[test]
    fn test_exponential_one_scale_height() {
        let d = exponential_density(8_000.0, 8_000.0);
        assert!((d - (-1.0_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn test_triangular_shape() {
        let (lower, mode, upper) = (10_000.0, 25_000.0, 40_000.0);
        assert_eq!(triangular_density(5_000.0, lower, mode, upper), 0.0);
        assert_eq!(triangular_density(45_000.0, lower, mode, upper), 0.0);
        assert!((triangular_density(mode, lower, mode, upper) - 1.0).abs() < 1e-15);
        assert!((triangular_density(17_500.0, lower, mode, upper) - 0.5).abs() < 1e-15);
        assert!((triangular_density(32_500.0, lower, mode, upper) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_degenerate_layer_is_zero() {
        assert_eq!(triangular_density(25_000.0, 40_000.0, 25_000.0, 10_000.0), 0.0);
        assert_eq!(triangular_density(25_000.0, 25_000.0, 25_000.0, 25_000.0), 0.0);
    }

    #[test]
    fn test_mode_at_layer_edge() {
        // Sawtooth variants must stay finite.
        let rising = triangular_density(30_000.0, 10_000.0, 40_000.0, 40_000.0);
        let falling = triangular_density(30_000.0, 10_000.0, 10_000.0, 40_000.0);
        assert!(rising.is_finite() && (0.0..=1.0).contains(&rising));
        assert!(falling.is_finite() && (0.0..=1.0).contains(&falling));
    }
}
