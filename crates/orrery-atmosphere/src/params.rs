//! Atmosphere parameters and their derived scattering coefficients.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Raw physical parameters of an atmosphere.
///
/// Densities are sea-level particle counts per cubic meter; cross
/// sections are per-particle extinction areas in square meters, one per
/// wavelength channel (680/550/440 nm). Altitudes are meters above the
/// body surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereParams {
    /// Top of the atmosphere; extinction is zero above this altitude.
    pub exosphere_altitude: f64,
    /// Rayleigh density scale height.
    pub rayleigh_scale_height: f64,
    /// Rayleigh sea-level number density.
    pub rayleigh_density: f64,
    /// Rayleigh scattering cross section per channel.
    pub rayleigh_cross_sections: DVec3,
    /// Mie (aerosol) density scale height.
    pub mie_scale_height: f64,
    /// Mie sea-level number density.
    pub mie_density: f64,
    /// Mie scattering cross section, wavelength-independent.
    pub mie_cross_section: f64,
    /// Henyey-Greenstein anisotropy parameter g.
    pub mie_anisotropy: f64,
    /// Mie single-scattering albedo.
    pub mie_albedo: f64,
    /// Bottom of the ozone layer.
    pub ozone_lower: f64,
    /// Altitude of peak ozone density.
    pub ozone_mode: f64,
    /// Top of the ozone layer.
    pub ozone_upper: f64,
    /// Ozone peak number density.
    pub ozone_density: f64,
    /// Ozone absorption cross section per channel.
    pub ozone_cross_sections: DVec3,
}

impl AtmosphereParams {
    /// Earth-like parameters. Coefficients work out near the usual
    /// sea-level extinction values (Rayleigh ~5.8e-6/1.35e-5/3.31e-5
    /// per meter).
    pub fn earth_like() -> Self {
        Self {
            exosphere_altitude: 65_000.0,
            rayleigh_scale_height: 8_000.0,
            rayleigh_density: 2.504e25,
            rayleigh_cross_sections: DVec3::new(2.316e-31, 5.391e-31, 1.322e-30),
            mie_scale_height: 1_200.0,
            mie_density: 1.0e8,
            mie_cross_section: 2.1e-13,
            mie_anisotropy: 0.758,
            mie_albedo: 0.9,
            ozone_lower: 10_000.0,
            ozone_mode: 25_000.0,
            ozone_upper: 40_000.0,
            ozone_density: 8.0e17,
            ozone_cross_sections: DVec3::new(8.12e-25, 2.35e-24, 1.06e-25),
        }
    }

    /// The same parameters with the ozone layer removed.
    pub fn without_ozone(mut self) -> Self {
        self.ozone_density = 0.0;
        self
    }
}

/// Per-channel extinction coefficients at reference density, 1/m.
///
/// Derived from [`AtmosphereParams`] as density times cross section;
/// multiplied by the dimensionless optical-depth integrals at
/// evaluation time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScatteringCoefficients {
    pub rayleigh: DVec3,
    pub mie: DVec3,
    pub ozone: DVec3,
}

impl ScatteringCoefficients {
    fn from_params(params: &AtmosphereParams) -> Self {
        Self {
            rayleigh: params.rayleigh_density * params.rayleigh_cross_sections,
            mie: DVec3::splat(params.mie_density * params.mie_cross_section),
            ozone: params.ozone_density * params.ozone_cross_sections,
        }
    }
}

/// An atmosphere entity: raw parameters plus their derived
/// coefficients.
///
/// The coefficients are a dependent field. Mutating parameters through
/// [`Atmosphere::set_params`] keeps them current; holders that receive
/// external change notifications instead call
/// [`Atmosphere::recompute_coefficients`] before the next integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Atmosphere {
    params: AtmosphereParams,
    coefficients: ScatteringCoefficients,
}

impl Atmosphere {
    pub fn new(params: AtmosphereParams) -> Self {
        Self {
            params,
            coefficients: ScatteringCoefficients::from_params(&params),
        }
    }

    pub fn params(&self) -> &AtmosphereParams {
        &self.params
    }

    /// Mutable access to the raw parameters without rederiving the
    /// coefficients. Callers that mutate through this must signal the
    /// change so [`Atmosphere::recompute_coefficients`] runs before the
    /// next integration.
    pub fn params_mut(&mut self) -> &mut AtmosphereParams {
        &mut self.params
    }

    /// Replace the parameters and rederive the coefficients.
    pub fn set_params(&mut self, params: AtmosphereParams) {
        self.params = params;
        self.recompute_coefficients();
    }

    /// Rederive the coefficient triples from the current parameters.
    pub fn recompute_coefficients(&mut self) {
        self.coefficients = ScatteringCoefficients::from_params(&self.params);
    }

    pub fn coefficients(&self) -> &ScatteringCoefficients {
        &self.coefficients
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self::new(AtmosphereParams::earth_like())
    }
}
