//! Interpolated trajectory tables.
//!
//! A trajectory covers a half-open validity interval `[t0, t1)` split
//! into equal sub-intervals of length `dt`; each sub-interval stores one
//! Chebyshev series per Cartesian component. Position is continuous
//! across sub-interval boundaries by construction of the source tables;
//! velocity continuity is not guaranteed and not promised.

use std::collections::BTreeMap;

use glam::DVec3;

use orrery_math::chebyshev;
use orrery_frames::{BodyId, FrameVec, Icrf};

use crate::error::EphemerisError;

/// One body's interpolated trajectory. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    body: BodyId,
    t0: f64,
    t1: f64,
    dt: f64,
    coeffs_per_component: usize,
    /// Flat array: `[sub-interval][component][coefficient]`.
    coeffs: Vec<f64>,
}

impl Trajectory {
    /// Build a trajectory from its flat coefficient array.
    ///
    /// `coeffs` is laid out sub-interval-major, three components per
    /// sub-interval, `coeffs_per_component` values each. Panics only in
    /// debug builds if the array length disagrees with the interval
    /// count; loaders validate sizes before construction.
    pub fn new(
        body: BodyId,
        t0: f64,
        t1: f64,
        dt: f64,
        coeffs_per_component: usize,
        coeffs: Vec<f64>,
    ) -> Self {
        debug_assert!(dt > 0.0 && t1 > t0);
        debug_assert_eq!(
            coeffs.len(),
            Self::sub_interval_count_for(t0, t1, dt) * 3 * coeffs_per_component
        );
        Self {
            body,
            t0,
            t1,
            dt,
            coeffs_per_component,
            coeffs,
        }
    }

    /// The body this trajectory describes.
    pub fn body(&self) -> BodyId {
        self.body
    }

    /// Validity interval `[t0, t1)`, seconds since J2000.
    pub fn valid_range(&self) -> (f64, f64) {
        (self.t0, self.t1)
    }

    fn sub_interval_count_for(t0: f64, t1: f64, dt: f64) -> usize {
        ((t1 - t0) / dt).round() as usize
    }

    fn sub_interval_count(&self) -> usize {
        Self::sub_interval_count_for(self.t0, self.t1, self.dt)
    }

    /// Locate `t` within the table: sub-interval index and normalized
    /// offset in `[0, 1)`.
    ///
    /// `t` outside `[t0, t1)` is an error, never an extrapolation. The
    /// upper boundary is exclusive; interior boundaries select the
    /// right-hand sub-interval.
    pub fn sub_interval_of(&self, t: f64) -> Result<(usize, f64), EphemerisError> {
        if !(t >= self.t0 && t < self.t1) {
            return Err(EphemerisError::OutOfRange {
                body: self.body,
                t,
                t0: self.t0,
                t1: self.t1,
            });
        }
        let raw = (t - self.t0) / self.dt;
        // Floating-point roundup at the very end of the range could
        // otherwise index one past the last sub-interval.
        let index = (raw.floor() as usize).min(self.sub_interval_count() - 1);
        let offset = (t - self.t0 - index as f64 * self.dt) / self.dt;
        Ok((index, offset))
    }

    /// Interpolated ICRF position at `t` seconds since J2000, meters.
    pub fn position_at(&self, t: f64) -> Result<FrameVec<Icrf>, EphemerisError> {
        let (index, offset) = self.sub_interval_of(t)?;
        // Chebyshev argument on [-1, 1].
        let x = 2.0 * offset - 1.0;
        let stride = 3 * self.coeffs_per_component;
        let base = index * stride;
        let mut components = [0.0; 3];
        for (c, out) in components.iter_mut().enumerate() {
            let start = base + c * self.coeffs_per_component;
            *out = chebyshev(&self.coeffs[start..start + self.coeffs_per_component], x);
        }
        Ok(FrameVec::new(DVec3::from_array(components)))
    }
}

/// An ordered, immutable collection of trajectories keyed by body.
///
/// Loaded once, then shared read-only by every consumer; it is `Send +
/// Sync` because nothing mutates it after construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ephemeris {
    trajectories: BTreeMap<BodyId, Trajectory>,
}

impl Ephemeris {
    /// Build an ephemeris from a set of trajectories.
    pub fn new(trajectories: impl IntoIterator<Item = Trajectory>) -> Self {
        Self {
            trajectories: trajectories
                .into_iter()
                .map(|tr| (tr.body(), tr))
                .collect(),
        }
    }

    /// The trajectory for `body`, if this ephemeris covers it.
    pub fn trajectory(&self, body: BodyId) -> Result<&Trajectory, EphemerisError> {
        self.trajectories
            .get(&body)
            .ok_or(EphemerisError::UnknownBody(body))
    }

    /// Whether this ephemeris has a trajectory for `body`.
    pub fn covers(&self, body: BodyId) -> bool {
        self.trajectories.contains_key(&body)
    }

    /// ICRF position of `body` at `t` seconds since J2000, meters.
    pub fn position_at(&self, body: BodyId, t: f64) -> Result<FrameVec<Icrf>, EphemerisError> {
        self.trajectory(body)?.position_at(t)
    }

    /// Iterate trajectories in body-id order.
    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.values()
    }
}
