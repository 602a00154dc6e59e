//! Renderer-facing lighting parameters.

use glam::{Quat, Vec3};

/// The sky-pass output block, refreshed once per tick.
///
/// Everything here is single precision; the simulation narrows from
/// `f64` exactly once, when writing these fields. Directions are unit
/// vectors in the observer's East-Up-South frame; illuminances are
/// per-channel W/m^2; angles are radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkyPass {
    /// Unit direction from the observer toward the primary light.
    pub sun_direction: Vec3,
    /// Normalized per-channel color of the primary light after
    /// extinction; peak channel is 1.
    pub sun_color: Vec3,
    pub sun_angular_radius: f32,
    /// Illuminance above the atmosphere.
    pub sun_illuminance_outer: Vec3,
    /// Illuminance at the observer, after extinction.
    pub sun_illuminance: Vec3,

    /// Ambient sky illuminance, starlight floor included.
    pub sky_illuminance: Vec3,
    /// Single ground-bounce illuminance.
    pub bounce_illuminance: Vec3,

    /// Reflector position relative to the observer, meters.
    pub moon_position: Vec3,
    /// Reflector body orientation in the observer frame.
    pub moon_rotation: Quat,
    pub moon_angular_radius: f32,
    /// Sunlit component of the reflector's illuminance at the observer.
    pub moon_illuminance_sun: Vec3,
    /// Component re-reflected off the reference body.
    pub moon_illuminance_planet: Vec3,

    pub observer_elevation: f32,
    pub planet_radius: f32,

    pub rayleigh_scale_height: f32,
    pub mie_scale_height: f32,
    pub rayleigh_coefficients: Vec3,
    pub mie_coefficients: Vec3,
    pub ozone_coefficients: Vec3,
    pub mie_anisotropy: f32,
    /// Body surface radius.
    pub atmosphere_radius_inner: f32,
    /// Surface radius plus exosphere altitude.
    pub atmosphere_radius_outer: f32,

    /// Full ICRF -> EUS transform for frame-dependent effects such as
    /// starfields.
    pub icrf_to_eus_rotation: Quat,
    pub icrf_to_eus_translation: Vec3,
}
