//! Spherical coordinates and ecliptic/equatorial/horizontal conversions.
//!
//! All conversions are active rotations built from `DMat3` axis rotations,
//! so every pair of functions is an exact inverse up to floating-point
//! rounding. Angles are radians throughout.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DMat3, DVec3};

/// A position in spherical coordinates.
///
/// `azimuth` is measured in the XY plane from +X toward +Y; `elevation`
/// is measured from the XY plane toward +Z. For an equatorial-frame
/// vector these are right ascension and declination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    /// Distance from the origin, in the units of the input vector.
    pub radius: f64,
    /// In-plane angle from +X toward +Y, radians.
    pub azimuth: f64,
    /// Angle above the XY plane, radians, in `[-pi/2, pi/2]`.
    pub elevation: f64,
}

/// Convert a rectangular vector to spherical coordinates.
///
/// The zero vector maps to zero radius with zero angles rather than NaN.
pub fn rectangular_to_spherical(v: DVec3) -> Spherical {
    let radius = v.length();
    if radius == 0.0 {
        return Spherical {
            radius: 0.0,
            azimuth: 0.0,
            elevation: 0.0,
        };
    }
    Spherical {
        radius,
        azimuth: v.y.atan2(v.x),
        elevation: (v.z / radius).clamp(-1.0, 1.0).asin(),
    }
}

/// Convert spherical coordinates back to a rectangular vector.
pub fn spherical_to_rectangular(s: Spherical) -> DVec3 {
    let (sin_el, cos_el) = s.elevation.sin_cos();
    let (sin_az, cos_az) = s.azimuth.sin_cos();
    DVec3::new(
        s.radius * cos_el * cos_az,
        s.radius * cos_el * sin_az,
        s.radius * sin_el,
    )
}

/// Rotate an equatorial-frame vector into the ecliptic frame.
///
/// Both frames share +X toward the vernal equinox; the ecliptic frame is
/// reached by rotating about X by the obliquity.
pub fn equatorial_to_ecliptic(v: DVec3, obliquity: f64) -> DVec3 {
    DMat3::from_rotation_x(-obliquity) * v
}

/// Rotate an ecliptic-frame vector into the equatorial frame.
pub fn ecliptic_to_equatorial(v: DVec3, obliquity: f64) -> DVec3 {
    DMat3::from_rotation_x(obliquity) * v
}

/// Rotate an equatorial-frame vector into the observer's horizontal frame.
///
/// The horizontal frame is x = south, y = east, z = up (right-handed).
/// `latitude` is geodetic latitude and `lst` the local sidereal time,
/// both in radians.
pub fn equatorial_to_horizontal(v: DVec3, latitude: f64, lst: f64) -> DVec3 {
    DMat3::from_rotation_y(latitude - FRAC_PI_2) * (DMat3::from_rotation_z(-lst) * v)
}

/// Rotate a horizontal-frame vector back into the equatorial frame.
pub fn horizontal_to_equatorial(v: DVec3, latitude: f64, lst: f64) -> DVec3 {
    DMat3::from_rotation_z(lst) * (DMat3::from_rotation_y(FRAC_PI_2 - latitude) * v)
}

/// Altitude above the horizon of a horizontal-frame vector, radians.
pub fn horizontal_altitude(v: DVec3) -> f64 {
    rectangular_to_spherical(v).elevation
}

/// Azimuth of a horizontal-frame vector, radians in `[0, tau)`,
/// measured from north through east.
pub fn horizontal_azimuth(v: DVec3) -> f64 {
    // x = south, y = east, so north is -x.
    let az = v.y.atan2(-v.x);
    az.rem_euclid(TAU)
}
