//! Surface observer placement and the BCBF -> EUS transform.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::body::BodyId;
use crate::frame::{Bcbf, Eus, FrameTransform};

/// A single observer standing on (or under) the reference body's surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    /// The body the observer stands on.
    pub body: BodyId,
    /// Height above the body's mean radius, meters. Negative values place
    /// the observer below the reference sphere.
    pub elevation: f64,
    /// Geocentric latitude, radians.
    pub latitude: f64,
    /// Longitude, radians, positive east.
    pub longitude: f64,
}

impl Observer {
    /// Observer position in the body-fixed frame, meters from the body
    /// center.
    pub fn position_bcbf(&self, body_radius: f64) -> DVec3 {
        let r = body_radius + self.elevation;
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        DVec3::new(r * cos_lat * cos_lon, r * cos_lat * sin_lon, r * sin_lat)
    }

    /// Transform from the body-fixed frame to the observer's east-up-south
    /// frame.
    ///
    /// The basis is right-handed: x = east, y = up (away from the body
    /// center), z = south. Depends only on the observer's location and the
    /// body radius, never on time.
    pub fn bcbf_to_eus(&self, body_radius: f64) -> FrameTransform<Bcbf, Eus> {
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let (sin_lon, cos_lon) = self.longitude.sin_cos();

        let east = DVec3::new(-sin_lon, cos_lon, 0.0);
        let up = DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
        let south = DVec3::new(sin_lat * cos_lon, sin_lat * sin_lon, -cos_lat);

        // Rows of the rotation are the EUS basis expressed in BCBF.
        let rotation = DMat3::from_cols(east, up, south).transpose();
        let translation = -(rotation * self.position_bcbf(body_radius));
        FrameTransform::new(rotation, translation)
    }
}
