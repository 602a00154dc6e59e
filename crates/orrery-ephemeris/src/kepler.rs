//! Keplerian two-body propagation.

use std::f64::consts::TAU;

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use orrery_frames::{BodyId, FrameVec, Icrf};

/// Classical orbital elements plus the gravitational parameter of the
/// attracting body.
///
/// Angles are radians; lengths meters; `gravitational_parameter` is
/// `m^3/s^2`. Positions are relative to the parent body (or the ICRF
/// origin when `parent` is `None`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeplerOrbit {
    /// Semi-major axis, meters. Elliptical orbits only (`e < 1`).
    pub semi_major_axis: f64,
    /// Eccentricity, `[0, 1)`.
    pub eccentricity: f64,
    /// Inclination to the ICRF XY plane, radians.
    pub inclination: f64,
    /// Right ascension of the ascending node, radians.
    pub raan: f64,
    /// Argument of periapsis, radians.
    pub arg_periapsis: f64,
    /// True anomaly at `epoch`, radians.
    pub true_anomaly_epoch: f64,
    /// Element epoch, seconds since J2000.
    pub epoch: f64,
    /// Gravitational parameter of the attracting body, m^3/s^2.
    pub gravitational_parameter: f64,
    /// Body this orbit is centered on; `None` means the ICRF origin.
    pub parent: Option<BodyId>,
}

impl KeplerOrbit {
    /// Orbital period, seconds.
    pub fn period(&self) -> f64 {
        TAU * (self.semi_major_axis.powi(3) / self.gravitational_parameter).sqrt()
    }

    /// Mean motion, radians per second.
    pub fn mean_motion(&self) -> f64 {
        (self.gravitational_parameter / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Position at `t` seconds since J2000, relative to the parent body.
    pub fn position_at(&self, t: f64) -> FrameVec<Icrf> {
        self.state_at(t).0
    }

    /// Position and velocity at `t` seconds since J2000, relative to the
    /// parent body.
    pub fn state_at(&self, t: f64) -> (FrameVec<Icrf>, DVec3) {
        let e = self.eccentricity;

        // True anomaly at epoch -> eccentric -> mean anomaly at epoch.
        let ta0 = self.true_anomaly_epoch;
        let e_anom0 = 2.0 * (((1.0 - e) / (1.0 + e)).sqrt() * (ta0 / 2.0).tan()).atan();
        let mean0 = e_anom0 - e * e_anom0.sin();

        let mean = mean0 + self.mean_motion() * (t - self.epoch);
        let e_anom = solve_kepler(mean, e);

        let (sin_e, cos_e) = e_anom.sin_cos();
        let a = self.semi_major_axis;
        let b_over_a = (1.0 - e * e).sqrt();
        let r = a * (1.0 - e * cos_e);

        // Perifocal plane: x toward periapsis.
        let pos_pf = DVec3::new(a * (cos_e - e), a * b_over_a * sin_e, 0.0);
        let speed_factor = (self.gravitational_parameter * a).sqrt() / r;
        let vel_pf = DVec3::new(-speed_factor * sin_e, speed_factor * b_over_a * cos_e, 0.0);

        let rot = self.perifocal_to_icrf();
        (FrameVec::new(rot * pos_pf), rot * vel_pf)
    }

    /// Rotation from the perifocal plane into ICRF axes:
    /// Rz(raan) * Rx(inclination) * Rz(arg periapsis).
    fn perifocal_to_icrf(&self) -> DMat3 {
        DMat3::from_rotation_z(self.raan)
            * DMat3::from_rotation_x(self.inclination)
            * DMat3::from_rotation_z(self.arg_periapsis)
    }
}

/// Solve Kepler's equation `E - e sin E = M` by Newton's method.
///
/// The mean anomaly is reduced into `[0, 2*pi)` first; the
/// high-eccentricity seed is only valid there, and an unreduced
/// negative anomaly can push the iterate through the near-singular
/// derivative at `E = 0` and diverge. The removed whole turns are
/// added back to the solution, so the returned eccentric anomaly
/// satisfies the equation for the caller's original anomaly.
fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let reduced = mean_anomaly.rem_euclid(TAU);
    let mut e_anom = if eccentricity > 0.8 {
        std::f64::consts::PI
    } else {
        reduced
    };
    for _ in 0..32 {
        let f = e_anom - eccentricity * e_anom.sin() - reduced;
        let f_prime = 1.0 - eccentricity * e_anom.cos();
        let step = f / f_prime;
        e_anom -= step;
        if step.abs() < 1e-14 {
            break;
        }
    }
    e_anom + (mean_anomaly - reduced)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MU_SUN: f64 = 1.327_124_4e20;
    const AU: f64 = 1.495_978_707e11;

    fn earth_like() -> KeplerOrbit {
        KeplerOrbit {
            semi_major_axis: AU,
            eccentricity: 0.0167,
            inclination: 0.0,
            raan: 0.0,
            arg_periapsis: 1.796_6,
            true_anomaly_epoch: 0.0,
            epoch: 0.0,
            gravitational_parameter: MU_SUN,
            parent: Some(BodyId(10)),
        }
    }

    #[test]
    fn test_period_is_about_a_year() {
        let period = earth_like().period();
        let year = 365.25 * 86_400.0;
        assert!(
            (period - year).abs() / year < 0.01,
            "period {period} s should be close to one year"
        );
    }

    #[test]
    fn test_orbit_returns_after_one_period() {
        let orbit = earth_like();
        let p0 = orbit.position_at(0.0).inner();
        let p1 = orbit.position_at(orbit.period()).inner();
        assert!(
            (p1 - p0).length() < orbit.semi_major_axis * 1e-6,
            "drift after one period: {} m",
            (p1 - p0).length()
        );
    }

    #[test]
    fn test_circular_orbit_constant_radius_and_speed() {
        let orbit = KeplerOrbit {
            eccentricity: 0.0,
            ..earth_like()
        };
        let expected_speed = (MU_SUN / AU).sqrt();
        for i in 0..16 {
            let t = orbit.period() * i as f64 / 16.0;
            let (pos, vel) = orbit.state_at(t);
            assert!((pos.length() - AU).abs() < AU * 1e-9, "radius at t={t}");
            assert!(
                (vel.length() - expected_speed).abs() < expected_speed * 1e-9,
                "speed at t={t}"
            );
        }
    }

    #[test]
    fn test_periapsis_and_apoapsis_radii() {
        let orbit = KeplerOrbit {
            eccentricity: 0.3,
            true_anomaly_epoch: 0.0,
            arg_periapsis: 0.0,
            ..earth_like()
        };
        // Epoch anomaly 0 = periapsis; half a period later = apoapsis.
        let r_peri = orbit.position_at(0.0).length();
        let r_apo = orbit.position_at(orbit.period() / 2.0).length();
        assert!((r_peri - AU * 0.7).abs() < AU * 1e-6, "periapsis {r_peri}");
        assert!((r_apo - AU * 1.3).abs() < AU * 1e-6, "apoapsis {r_apo}");
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let orbit = earth_like();
        let t = 3.0e6;
        let dt = 1.0;
        let (_, vel) = orbit.state_at(t);
        let p0 = orbit.position_at(t - dt).inner();
        let p1 = orbit.position_at(t + dt).inner();
        let numeric = (p1 - p0) / (2.0 * dt);
        assert!(
            (vel - numeric).length() < vel.length() * 1e-6,
            "analytic {vel:?} vs numeric {numeric:?}"
        );
    }

    #[test]
    fn test_inclined_orbit_stays_in_plane() {
        let orbit = KeplerOrbit {
            inclination: 0.4,
            raan: 1.0,
            ..earth_like()
        };
        // Orbit normal: Rz(raan) * Rx(i) * z.
        let normal = DMat3::from_rotation_z(1.0) * DMat3::from_rotation_x(0.4) * DVec3::Z;
        for i in 0..8 {
            let t = orbit.period() * i as f64 / 8.0;
            let pos = orbit.position_at(t).inner();
            assert!(
                pos.dot(normal).abs() < AU * 1e-9,
                "position leaves orbital plane at t={t}"
            );
        }
    }

    #[test]
    fn test_kepler_solver_high_eccentricity() {
        let e = 0.95;
        for i in 0..24 {
            let mean = TAU * i as f64 / 24.0 - std::f64::consts::PI;
            let e_anom = solve_kepler(mean, e);
            let residual = e_anom - e * e_anom.sin() - mean;
            assert!(residual.abs() < 1e-10, "residual {residual} at M={mean}");
        }
    }

    #[test]
    fn test_kepler_solver_unreduced_mean_anomaly() {
        // Anomalies far outside [0, 2*pi), both signs, across the
        // eccentricity range.
        for &e in &[0.0, 0.3, 0.85, 0.97] {
            for &mean in &[-123.456, -TAU - 0.1, -1.0e-3, 7.0, 400.0] {
                let e_anom = solve_kepler(mean, e);
                let residual = e_anom - e * e_anom.sin() - mean;
                assert!(
                    residual.abs() < 1e-9,
                    "residual {residual} at M={mean}, e={e}"
                );
            }
        }
    }

    #[test]
    fn test_eccentric_orbit_before_epoch() {
        let orbit = KeplerOrbit {
            eccentricity: 0.9,
            true_anomaly_epoch: 0.0,
            arg_periapsis: 0.0,
            ..earth_like()
        };
        let period = orbit.period();
        // Positions before the epoch must stay between periapsis and
        // apoapsis and repeat one period later.
        for i in 1..8 {
            let t = -period * i as f64 / 8.0;
            let r = orbit.position_at(t).length();
            assert!(
                r > AU * 0.099 && r < AU * 1.901,
                "radius {r} m out of orbit bounds at t={t}"
            );
            let wrapped = orbit.position_at(t + period).inner();
            let here = orbit.position_at(t).inner();
            assert!(
                (wrapped - here).length() < AU * 1e-6,
                "orbit not periodic at t={t}: drift {} m",
                (wrapped - here).length()
            );
        }
    }
}
