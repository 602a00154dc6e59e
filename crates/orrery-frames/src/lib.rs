//! Reference frames: frame-tagged vectors, body orientation, observer
//! placement, and the ICRF -> BCBF -> EUS transform chain.
//!
//! Every position in the simulation carries its frame in the type system,
//! so a transform can only be applied to a vector expressed in its source
//! frame. The compiler rejects cross-frame mixing outright.

pub mod body;
pub mod chain;
pub mod frame;
pub mod observer;

pub use body::{BodyId, CelestialBody, OrientationAngles};
pub use chain::FrameChain;
pub use frame::{Bcbf, Eus, Frame, FrameTransform, FrameVec, Icrf};
pub use observer::Observer;
