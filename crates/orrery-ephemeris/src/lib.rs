//! Orbital state evaluation: Keplerian two-body propagation, interpolated
//! Chebyshev trajectory tables, and the DE-style binary ephemeris loader.
//!
//! All positions come out in the ICRF frame in meters, tagged via
//! `orrery_frames::FrameVec<Icrf>`. Time is seconds since the J2000
//! epoch. Loaded `Ephemeris` tables are immutable and `Send + Sync`, so
//! one table can back every consumer for the lifetime of the process.

pub mod de_file;
pub mod error;
pub mod kepler;
pub mod trajectory;

pub use de_file::{load_de_bytes, load_de_file};
pub use error::EphemerisError;
pub use kepler::KeplerOrbit;
pub use trajectory::{Ephemeris, Trajectory};
