//! Ray-marched optical depth and transmittance.

use glam::DVec3;

use orrery_math::ray_sphere_intersect;

use crate::params::Atmosphere;
use crate::profile::{exponential_density, triangular_density};

/// Empirical extinction multiplier on the Mie optical depth.
///
/// Tuned, not derived; treat comparisons against it as approximate.
pub const MIE_EXTINCTION_FUDGE: f64 = 1.1;

/// Dimensionless optical-depth integrals along one ray.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OpticalDepths {
    pub rayleigh: f64,
    pub mie: f64,
    pub ozone: f64,
}

/// Integrate the three density profiles along a ray.
///
/// `origin` is relative to the body center, meters; `direction` must be
/// normalized. Midpoint quadrature with `samples` equal steps across
/// the ray's chord through the atmosphere shell. A ray that misses the
/// shell entirely, or only touches it behind the origin, has zero
/// depth.
pub fn optical_depths(
    origin: DVec3,
    direction: DVec3,
    body_radius: f64,
    atmosphere: &Atmosphere,
    samples: u32,
) -> OpticalDepths {
    let params = atmosphere.params();
    let shell_radius = body_radius + params.exosphere_altitude;

    let Some((t_near, t_far)) =
        ray_sphere_intersect(origin, direction, DVec3::ZERO, shell_radius)
    else {
        return OpticalDepths::default();
    };

    let t_start = t_near.max(0.0);
    if t_far <= t_start || samples == 0 {
        return OpticalDepths::default();
    }

    let step = (t_far - t_start) / samples as f64;
    let mut depths = OpticalDepths::default();
    for i in 0..samples {
        let t = t_start + (i as f64 + 0.5) * step;
        let altitude = (origin + direction * t).length() - body_radius;

        depths.rayleigh += exponential_density(altitude, params.rayleigh_scale_height) * step;
        depths.mie += exponential_density(altitude, params.mie_scale_height) * step;
        depths.ozone += triangular_density(
            altitude,
            params.ozone_lower,
            params.ozone_mode,
            params.ozone_upper,
        ) * step;
    }
    depths
}

/// Per-channel transmittance along a ray from an observer on or above
/// the body surface.
///
/// The ray starts `observer_elevation` meters above the surface and
/// leaves along `direction`, expressed in the observer's horizontal
/// frame where +Y is up. The result is
/// `exp(-(beta_R * tau_R + beta_M * tau_M * fudge + beta_O * tau_O))`
/// per channel, always in `[0, 1]`, and exactly one when the ray never
/// crosses the atmosphere.
pub fn transmittance(
    atmosphere: &Atmosphere,
    body_radius: f64,
    observer_elevation: f64,
    direction: DVec3,
    samples: u32,
) -> DVec3 {
    let origin = DVec3::new(0.0, body_radius + observer_elevation, 0.0);
    let depths = optical_depths(origin, direction, body_radius, atmosphere, samples);

    let coeffs = atmosphere.coefficients();
    let tau = coeffs.rayleigh * depths.rayleigh
        + coeffs.mie * depths.mie * MIE_EXTINCTION_FUDGE
        + coeffs.ozone * depths.ozone;
    DVec3::new((-tau.x).exp(), (-tau.y).exp(), (-tau.z).exp())
}
