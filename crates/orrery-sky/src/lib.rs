//! Illumination composition: the per-tick simulation core that turns
//! orbital state, frame chains, and atmospheric transmittance into
//! renderer-facing lighting parameters.
//!
//! [`CelestialSim::update`] is the single entry point. It advances
//! simulated time, recomputes body positions, rebuilds the frame chain
//! for the observer's reference body, and writes direct, sky, bounce,
//! and reflected illuminance into a [`SkyPass`]. All internal math is
//! double precision; values narrow to `f32` only at the sky-pass
//! boundary.

pub mod lights;
pub mod scene;
pub mod sim;
pub mod sky_pass;

pub use lights::{Blackbody, DiffuseReflector};
pub use scene::{Orbit, Scene};
pub use sim::{CelestialSim, SimError, SimSettings, TickStatus};
pub use sky_pass::SkyPass;
