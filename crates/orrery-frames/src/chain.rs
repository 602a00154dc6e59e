//! The composed ICRF -> BCBF -> EUS transform chain.
//!
//! The ICRF -> BCBF leg depends on time and is rebuilt every tick. The
//! BCBF -> EUS leg depends only on the observer and body radius, so it is
//! cached and rebuilt lazily when the observer dirty flag fires.

use crate::body::CelestialBody;
use crate::frame::{Bcbf, Eus, FrameTransform, FrameVec, Icrf};
use crate::observer::Observer;

/// Cached transform chain for the current reference body and observer.
#[derive(Clone, Debug)]
pub struct FrameChain {
    icrf_to_bcbf: FrameTransform<Icrf, Bcbf>,
    bcbf_to_eus: FrameTransform<Bcbf, Eus>,
    icrf_to_eus: FrameTransform<Icrf, Eus>,
    observer_leg_valid: bool,
}

impl Default for FrameChain {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameChain {
    /// An identity chain with a stale observer leg.
    pub fn new() -> Self {
        Self {
            icrf_to_bcbf: FrameTransform::identity(),
            bcbf_to_eus: FrameTransform::identity(),
            icrf_to_eus: FrameTransform::identity(),
            observer_leg_valid: false,
        }
    }

    /// Mark the observer leg stale. Called when the observer or the
    /// reference body is constructed, mutated, or replaced.
    pub fn mark_observer_dirty(&mut self) {
        self.observer_leg_valid = false;
    }

    /// Whether the next rebuild will recompute the observer leg.
    pub fn observer_leg_dirty(&self) -> bool {
        !self.observer_leg_valid
    }

    /// Rebuild the chain for time `t` (seconds since J2000).
    ///
    /// The ICRF -> BCBF leg is always recomputed; the BCBF -> EUS leg only
    /// when dirty. The composed transform is refreshed either way.
    pub fn rebuild(
        &mut self,
        body: &CelestialBody,
        body_position: FrameVec<Icrf>,
        observer: &Observer,
        t: f64,
    ) {
        self.icrf_to_bcbf = body.icrf_to_bcbf(body_position, t);
        if !self.observer_leg_valid {
            self.bcbf_to_eus = observer.bcbf_to_eus(body.radius);
            self.observer_leg_valid = true;
        }
        self.icrf_to_eus = self.icrf_to_bcbf.then(&self.bcbf_to_eus);
    }

    /// The time-dependent ICRF -> BCBF leg.
    pub fn icrf_to_bcbf(&self) -> &FrameTransform<Icrf, Bcbf> {
        &self.icrf_to_bcbf
    }

    /// The cached BCBF -> EUS leg.
    pub fn bcbf_to_eus(&self) -> &FrameTransform<Bcbf, Eus> {
        &self.bcbf_to_eus
    }

    /// The composed ICRF -> EUS transform, for placing celestial positions
    /// around the observer and for downstream starfield effects.
    pub fn icrf_to_eus(&self) -> &FrameTransform<Icrf, Eus> {
        &self.icrf_to_eus
    }
}
