//! Ray/sphere intersection and apparent-size helpers.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec3;

/// Intersect a ray with a sphere.
///
/// `dir` must be normalized. Returns `(t_near, t_far)` along the ray, or
/// `None` when the ray misses entirely or the sphere lies behind the
/// origin (`t_far < 0`). `t_near` may be negative when the origin is
/// inside the sphere.
pub fn ray_sphere_intersect(
    origin: DVec3,
    dir: DVec3,
    center: DVec3,
    radius: f64,
) -> Option<(f64, f64)> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t_far = -b + sqrt_disc;
    if t_far < 0.0 {
        return None;
    }
    Some((-b - sqrt_disc, t_far))
}

/// Apparent angular radius of a sphere of radius `body_radius` seen from
/// `distance` away, radians.
///
/// Distances at or inside the sphere (including non-positive distances)
/// clamp to a quarter turn, so the grazing/contained case never produces
/// NaN.
pub fn angular_radius(body_radius: f64, distance: f64) -> f64 {
    if distance <= body_radius {
        return FRAC_PI_2;
    }
    (body_radius / distance).clamp(0.0, 1.0).asin()
}

/// Solid angle subtended by a sphere: `2*pi*(1 - cos(angular radius))`.
///
/// Tends to zero as the distance grows and saturates at `2*pi` (a full
/// hemisphere) when the observer touches or enters the sphere.
pub fn solid_angle(body_radius: f64, distance: f64) -> f64 {
    TAU * (1.0 - angular_radius(body_radius, distance).cos())
}
