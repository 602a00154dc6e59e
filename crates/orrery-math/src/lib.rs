//! Frame math leaf: pure, stateless astronomy helpers.
//!
//! Everything here operates on plain `glam` vectors with no frame tagging;
//! the typed frame layer lives in `orrery-frames` and builds its matrices
//! out of these functions.

pub mod geometry;
pub mod poly;
pub mod rotation;

pub use geometry::{angular_radius, ray_sphere_intersect, solid_angle};
pub use poly::{chebyshev, horner};
pub use rotation::{
    Spherical, ecliptic_to_equatorial, equatorial_to_ecliptic, equatorial_to_horizontal,
    horizontal_altitude, horizontal_azimuth, horizontal_to_equatorial, rectangular_to_spherical,
    spherical_to_rectangular,
};
