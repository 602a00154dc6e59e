//! Atmospheric extinction: density profiles, scattering coefficients,
//! and ray-marched transmittance.
//!
//! The model is a spherically symmetric atmosphere around a body of
//! known radius: exponential Rayleigh and Mie density profiles plus a
//! triangular ozone layer. Optical depth along a ray is integrated with
//! fixed-count midpoint quadrature and turned into a per-wavelength
//! transmittance triple (680/550/440 nm).

pub mod params;
pub mod profile;
pub mod transmittance;

pub use params::{Atmosphere, AtmosphereParams, ScatteringCoefficients};
pub use transmittance::{transmittance, MIE_EXTINCTION_FUDGE};
