//! The scene snapshot handed to the simulation each tick.

use std::collections::BTreeMap;
use std::sync::Arc;

use orrery_atmosphere::Atmosphere;
use orrery_ephemeris::{Ephemeris, KeplerOrbit};
use orrery_frames::{BodyId, CelestialBody, Observer};

use crate::lights::{Blackbody, DiffuseReflector};

/// How a body's position is evaluated.
#[derive(Clone, Debug, PartialEq)]
pub enum Orbit {
    /// Two-body propagation from classical elements.
    Kepler(KeplerOrbit),
    /// Interpolation from the scene's shared ephemeris table, keyed by
    /// this body's id.
    Ephemeris,
}

impl Orbit {
    /// The body this orbit is centered on. Ephemeris trajectories are
    /// already absolute.
    pub fn parent(&self) -> Option<BodyId> {
        match self {
            Orbit::Kepler(orbit) => orbit.parent,
            Orbit::Ephemeris => None,
        }
    }
}

/// All entities the simulation can see, bundled explicitly instead of
/// being pulled from component storage mid-algorithm.
///
/// Bodies without an orbit sit at the ICRF origin, which makes them
/// usable as hierarchy roots. A populated scene needs an observer, a
/// [`CelestialBody`] and an [`Orbit`] for the observer's body, and at
/// least one [`Blackbody`] before illumination outputs are nonzero.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub bodies: BTreeMap<BodyId, CelestialBody>,
    pub orbits: BTreeMap<BodyId, Orbit>,
    pub blackbodies: BTreeMap<BodyId, Blackbody>,
    pub reflectors: BTreeMap<BodyId, DiffuseReflector>,
    pub atmospheres: BTreeMap<BodyId, Atmosphere>,
    pub observer: Option<Observer>,
    /// Shared read-only trajectory table for [`Orbit::Ephemeris`].
    pub ephemeris: Option<Arc<Ephemeris>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }
}
