//! Light-emitting and light-reflecting body components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Sampling wavelengths for the three output channels, meters.
pub const CHANNEL_WAVELENGTHS: [f64; 3] = [680.0e-9, 550.0e-9, 440.0e-9];

/// Effective bandwidth folded into each channel, meters.
const CHANNEL_BANDWIDTH: f64 = 1.0e-7;

const PLANCK: f64 = 6.626_070_15e-34;
const LIGHT_SPEED: f64 = 2.997_924_58e8;
const BOLTZMANN: f64 = 1.380_649e-23;

/// A body that emits light, characterized by its per-channel luminance
/// in W sr^-1 m^-2.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blackbody {
    pub luminance: DVec3,
}

impl Blackbody {
    pub fn new(luminance: DVec3) -> Self {
        Self { luminance }
    }

    /// Luminance of an ideal blackbody at `kelvin`, sampled with
    /// Planck's law at the three channel wavelengths.
    pub fn from_temperature(kelvin: f64) -> Self {
        let mut luminance = DVec3::ZERO;
        for (c, &wavelength) in CHANNEL_WAVELENGTHS.iter().enumerate() {
            luminance[c] = spectral_radiance(wavelength, kelvin) * CHANNEL_BANDWIDTH;
        }
        Self { luminance }
    }
}

/// Planck spectral radiance, W sr^-1 m^-3.
fn spectral_radiance(wavelength: f64, kelvin: f64) -> f64 {
    if kelvin <= 0.0 {
        return 0.0;
    }
    let numerator = 2.0 * PLANCK * LIGHT_SPEED * LIGHT_SPEED / wavelength.powi(5);
    let exponent = PLANCK * LIGHT_SPEED / (wavelength * BOLTZMANN * kelvin);
    numerator / (exponent.exp() - 1.0)
}

/// A body that re-emits received light diffusely (a moon).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffuseReflector {
    /// Per-channel albedo in `[0, 1]`.
    pub albedo: DVec3,
}

impl DiffuseReflector {
    pub fn new(albedo: DVec3) -> Self {
        Self { albedo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sunlike_illuminance_magnitude() {
        // Sun seen from 1 AU: solid angle ~6.8e-5 sr; each 100 nm band
        // carries on the order of 100 W/m^2 of the solar constant.
        let sun = Blackbody::from_temperature(5_772.0);
        let illuminance = sun.luminance * 6.8e-5;
        for c in 0..3 {
            assert!(
                illuminance[c] > 30.0 && illuminance[c] < 500.0,
                "channel {c}: {} W/m^2",
                illuminance[c]
            );
        }
    }

    #[test]
    fn test_hotter_bodies_are_bluer() {
        let cool = Blackbody::from_temperature(4_000.0);
        let hot = Blackbody::from_temperature(10_000.0);
        let cool_ratio = cool.luminance.z / cool.luminance.x;
        let hot_ratio = hot.luminance.z / hot.luminance.x;
        assert!(
            hot_ratio > cool_ratio,
            "blue/red {hot_ratio} at 10000 K vs {cool_ratio} at 4000 K"
        );
    }

    #[test]
    fn test_zero_temperature_is_dark() {
        assert_eq!(Blackbody::from_temperature(0.0).luminance, DVec3::ZERO);
    }
}
