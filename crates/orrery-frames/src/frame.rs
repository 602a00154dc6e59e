//! Phantom-typed frame tags and rigid transforms between them.
//!
//! A `FrameVec<Icrf>` and a `FrameVec<Eus>` are different types even
//! though both wrap a `DVec3`; mixing them is a compile error:
//!
//! ```compile_fail
//! use orrery_frames::{Bcbf, Eus, FrameTransform, FrameVec, Icrf};
//!
//! let v: FrameVec<Eus> = FrameVec::new(glam::DVec3::X);
//! let t: FrameTransform<Icrf, Bcbf> = FrameTransform::identity();
//! t.apply(v); // expected FrameVec<Icrf>, found FrameVec<Eus>
//! ```

use std::fmt;
use std::marker::PhantomData;

use glam::{DMat3, DVec3};

/// Marker trait for reference-frame tags.
pub trait Frame: Copy + Clone + fmt::Debug + 'static {
    /// Short frame name for diagnostics ("ICRF", "BCBF", "EUS").
    const NAME: &'static str;
}

/// International Celestial Reference Frame: inertial, origin at the
/// system barycenter (or a chosen root body), axes fixed against the
/// stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Icrf;

/// Body-Centered Body-Fixed frame: origin at the reference body's
/// center, axes rotating with its crust.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bcbf;

/// East-Up-South observer frame: origin at the observer, y pointing away
/// from the body center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eus;

impl Frame for Icrf {
    const NAME: &'static str = "ICRF";
}
impl Frame for Bcbf {
    const NAME: &'static str = "BCBF";
}
impl Frame for Eus {
    const NAME: &'static str = "EUS";
}

/// A position vector tagged with the frame it is expressed in.
#[derive(Clone, Copy, PartialEq)]
pub struct FrameVec<F: Frame> {
    v: DVec3,
    _frame: PhantomData<F>,
}

impl<F: Frame> FrameVec<F> {
    /// Tag a raw vector with frame `F`.
    pub fn new(v: DVec3) -> Self {
        Self {
            v,
            _frame: PhantomData,
        }
    }

    /// The untagged vector.
    pub fn inner(self) -> DVec3 {
        self.v
    }

    /// Euclidean length in meters.
    pub fn length(self) -> f64 {
        self.v.length()
    }
}

impl<F: Frame> fmt::Debug for FrameVec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {}, {})", F::NAME, self.v.x, self.v.y, self.v.z)
    }
}

/// A rigid transform (rotation then translation) from frame `Src` into
/// frame `Dst`: `dst = rotation * src + translation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransform<Src: Frame, Dst: Frame> {
    /// Rotation part, applied first.
    pub rotation: DMat3,
    /// Translation part, expressed in the destination frame.
    pub translation: DVec3,
    _frames: PhantomData<(Src, Dst)>,
}

impl<Src: Frame, Dst: Frame> FrameTransform<Src, Dst> {
    /// Build a transform from its rotation and translation parts.
    pub fn new(rotation: DMat3, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
            _frames: PhantomData,
        }
    }

    /// The identity transform (a frame relabel).
    pub fn identity() -> Self {
        Self::new(DMat3::IDENTITY, DVec3::ZERO)
    }

    /// Transform a position from `Src` into `Dst`.
    pub fn apply(&self, v: FrameVec<Src>) -> FrameVec<Dst> {
        FrameVec::new(self.rotation * v.inner() + self.translation)
    }

    /// Rotate a direction from `Src` into `Dst`, ignoring translation.
    pub fn apply_direction(&self, dir: DVec3) -> DVec3 {
        self.rotation * dir
    }

    /// Compose with a following transform, producing `Src -> Next`.
    pub fn then<Next: Frame>(
        &self,
        next: &FrameTransform<Dst, Next>,
    ) -> FrameTransform<Src, Next> {
        FrameTransform::new(
            next.rotation * self.rotation,
            next.rotation * self.translation + next.translation,
        )
    }

    /// The inverse transform, `Dst -> Src`.
    ///
    /// Valid because frame rotations are orthonormal, so the inverse
    /// rotation is the transpose.
    pub fn inverse(&self) -> FrameTransform<Dst, Src> {
        let rot_inv = self.rotation.transpose();
        FrameTransform::new(rot_inv, -(rot_inv * self.translation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_rotates_then_translates() {
        let t: FrameTransform<Icrf, Bcbf> = FrameTransform::new(
            DMat3::from_rotation_z(std::f64::consts::FRAC_PI_2),
            DVec3::new(10.0, 0.0, 0.0),
        );
        let out = t.apply(FrameVec::new(DVec3::X)).inner();
        assert!((out - DVec3::new(10.0, 1.0, 0.0)).length() < 1e-12, "{out:?}");
    }

    #[test]
    fn test_inverse_round_trips() {
        let t: FrameTransform<Bcbf, Eus> = FrameTransform::new(
            DMat3::from_rotation_x(0.4) * DMat3::from_rotation_z(-1.1),
            DVec3::new(3.0, -7.0, 2.0),
        );
        let v = FrameVec::<Bcbf>::new(DVec3::new(0.5, 8.0, -2.5));
        let back = t.inverse().apply(t.apply(v));
        assert!((back.inner() - v.inner()).length() < 1e-9);
    }

    #[test]
    fn test_composition_matches_sequential_application() {
        let a: FrameTransform<Icrf, Bcbf> =
            FrameTransform::new(DMat3::from_rotation_y(0.3), DVec3::new(1.0, 2.0, 3.0));
        let b: FrameTransform<Bcbf, Eus> =
            FrameTransform::new(DMat3::from_rotation_z(-0.8), DVec3::new(-4.0, 0.0, 9.0));
        let v = FrameVec::<Icrf>::new(DVec3::new(2.0, -1.0, 0.25));

        let sequential = b.apply(a.apply(v));
        let composed = a.then(&b).apply(v);
        assert!((sequential.inner() - composed.inner()).length() < 1e-9);
    }

    #[test]
    fn test_direction_ignores_translation() {
        let t: FrameTransform<Icrf, Eus> =
            FrameTransform::new(DMat3::IDENTITY, DVec3::new(100.0, 100.0, 100.0));
        assert_eq!(t.apply_direction(DVec3::X), DVec3::X);
    }
}
