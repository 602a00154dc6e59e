//! Celestial bodies: physical size, reflectivity, and spin-axis
//! orientation polynomials.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use orrery_math::horner;

use crate::frame::{Bcbf, FrameTransform, FrameVec, Icrf};

/// Seconds per Julian day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Seconds per Julian century.
pub const SECONDS_PER_CENTURY: f64 = 36_525.0 * SECONDS_PER_DAY;

/// Identifier of a celestial body within a scene.
///
/// The DE-style ephemeris loader assigns the conventional item numbers
/// (Mercury = 0 .. Sun = 10); purely scripted scenes may use any values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Instantaneous spin-axis orientation of a body: pole right ascension
/// and declination, plus the prime-meridian angle, all radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationAngles {
    pub pole_ra: f64,
    pub pole_dec: f64,
    pub prime_meridian: f64,
}

/// A celestial body's physical and rotational model.
///
/// Orientation follows the IAU convention: pole right ascension and
/// declination are polynomials in Julian centuries since J2000, the
/// prime-meridian angle a polynomial in Julian days. Coefficients are
/// radians, ascending power order, evaluated by Horner's method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    /// Mean radius in meters.
    pub radius: f64,
    /// Per-channel Bond-style albedo; only meaningful for reflectors and
    /// for planet-shine off the reference body.
    pub albedo: DVec3,
    /// Pole right ascension coefficients (radians vs Julian centuries).
    pub pole_ra: Vec<f64>,
    /// Pole declination coefficients (radians vs Julian centuries).
    pub pole_dec: Vec<f64>,
    /// Prime-meridian angle coefficients (radians vs Julian days).
    pub prime_meridian: Vec<f64>,
}

impl CelestialBody {
    /// Evaluate the orientation polynomials at `t` seconds since J2000.
    pub fn orientation_at(&self, t: f64) -> OrientationAngles {
        let centuries = t / SECONDS_PER_CENTURY;
        let days = t / SECONDS_PER_DAY;
        OrientationAngles {
            pole_ra: horner(&self.pole_ra, centuries),
            pole_dec: horner(&self.pole_dec, centuries),
            prime_meridian: horner(&self.prime_meridian, days),
        }
    }

    /// Rotation from ICRF axes to this body's crust-fixed axes at `t`.
    ///
    /// Standard 3-axis sequence: Z by `90 deg + ra`, X by `90 deg - dec`,
    /// Z by the prime-meridian angle. These are coordinate (passive)
    /// rotations, hence the negated angles on glam's active matrices.
    pub fn icrf_to_bcbf_rotation(&self, t: f64) -> DMat3 {
        let angles = self.orientation_at(t);
        DMat3::from_rotation_z(-angles.prime_meridian)
            * DMat3::from_rotation_x(angles.pole_dec - FRAC_PI_2)
            * DMat3::from_rotation_z(-FRAC_PI_2 - angles.pole_ra)
    }

    /// Full ICRF -> BCBF transform given the body's ICRF position at `t`.
    ///
    /// The translation re-centers the frame on the body, expressed in the
    /// already-rotated axes.
    pub fn icrf_to_bcbf(
        &self,
        position: FrameVec<Icrf>,
        t: f64,
    ) -> FrameTransform<Icrf, Bcbf> {
        let rotation = self.icrf_to_bcbf_rotation(t);
        FrameTransform::new(rotation, -(rotation * position.inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Earth's IAU orientation model, radians.
    fn earth() -> CelestialBody {
        CelestialBody {
            radius: 6_378_100.0,
            albedo: DVec3::splat(0.3),
            pole_ra: vec![0.0, -0.641_f64.to_radians()],
            pole_dec: vec![90.0_f64.to_radians(), -0.557_f64.to_radians()],
            prime_meridian: vec![190.147_f64.to_radians(), 360.985_623_5_f64.to_radians()],
        }
    }

    #[test]
    fn test_orientation_polynomials_evaluate_at_epoch() {
        let angles = earth().orientation_at(0.0);
        assert!((angles.pole_ra - 0.0).abs() < 1e-12);
        assert!((angles.pole_dec - FRAC_PI_2).abs() < 1e-12);
        assert!((angles.prime_meridian - 190.147_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_prime_meridian_advances_one_turn_per_sidereal_day() {
        let body = earth();
        let w0 = body.orientation_at(0.0).prime_meridian;
        let w1 = body.orientation_at(SECONDS_PER_DAY).prime_meridian;
        let advance = (w1 - w0).to_degrees();
        assert!(
            (advance - 360.985_623_5).abs() < 1e-6,
            "daily rotation {advance} deg"
        );
    }

    #[test]
    fn test_bcbf_rotation_is_orthonormal() {
        let rot = earth().icrf_to_bcbf_rotation(1.0e7);
        let product = rot * rot.transpose();
        for col in 0..3 {
            for row in 0..3 {
                let expected = if col == row { 1.0 } else { 0.0 };
                assert!(
                    (product.col(col)[row] - expected).abs() < 1e-12,
                    "R * R^T deviates at ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn test_bcbf_origin_is_body_center() {
        let body = earth();
        let pos = FrameVec::<Icrf>::new(DVec3::new(1.5e11, -2.0e10, 4.0e9));
        let transform = body.icrf_to_bcbf(pos, 1234.0);
        let centered = transform.apply(pos);
        assert!(
            centered.length() < 1e-3,
            "body center should map to the BCBF origin, got {centered:?}"
        );
    }

    /// Mars-like tilted pole so the test exercises all three rotations.
    fn tilted_body() -> CelestialBody {
        CelestialBody {
            radius: 3_396_200.0,
            albedo: DVec3::splat(0.25),
            pole_ra: vec![317.681_f64.to_radians()],
            pole_dec: vec![52.887_f64.to_radians()],
            prime_meridian: vec![176.63_f64.to_radians(), 350.891_98_f64.to_radians()],
        }
    }

    #[test]
    fn test_pole_maps_to_bcbf_z() {
        // A point directly above the body's north pole must land on +Z in
        // BCBF regardless of the prime-meridian angle.
        let body = tilted_body();
        let t = 3.7e6;
        let angles = body.orientation_at(t);
        let pole_dir = DVec3::new(
            angles.pole_dec.cos() * angles.pole_ra.cos(),
            angles.pole_dec.cos() * angles.pole_ra.sin(),
            angles.pole_dec.sin(),
        );
        let body_pos = FrameVec::<Icrf>::new(DVec3::ZERO);
        let transform = body.icrf_to_bcbf(body_pos, t);
        let mapped = transform.apply(FrameVec::new(pole_dir * 1.0e7)).inner();
        assert!(
            (mapped.normalize() - DVec3::Z).length() < 1e-9,
            "pole mapped to {mapped:?}"
        );
    }
}
