//! Position and orientation of a node in the instrument frame.

use beamline_core::{Event, Vec3};
use nalgebra::Rotation3;

/// Where a node sits. The rotation maps local directions to global ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    position: Vec3,
    rotation: Rotation3<f64>,
}

impl Default for Placement {
    fn default() -> Self {
        Self::origin()
    }
}

impl Placement {
    /// The global origin, unrotated.
    pub fn origin() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Rotation3::identity(),
        }
    }

    /// Unrotated placement at `(x, y, z)` metres.
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            rotation: Rotation3::identity(),
        }
    }

    /// Replace the rotation with XYZ Euler angles in degrees: rotate about
    /// x, then y, then z.
    pub fn rotated_deg(mut self, rx: f64, ry: f64, rz: f64) -> Self {
        self.rotation =
            Rotation3::from_euler_angles(rx.to_radians(), ry.to_radians(), rz.to_radians());
        self
    }

    /// Replace the rotation.
    pub fn with_rotation(mut self, rotation: Rotation3<f64>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Position in the instrument frame.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Rotation from local to global.
    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }

    /// Interpret `self` relative to `parent` and return the absolute
    /// placement.
    pub fn relative_to(&self, parent: &Placement) -> Placement {
        Placement {
            position: parent.position + parent.rotation * self.position,
            rotation: parent.rotation * self.rotation,
        }
    }

    /// Whether this is the unrotated global origin.
    pub fn is_identity(&self) -> bool {
        self.position == Vec3::zeros() && self.rotation == Rotation3::identity()
    }

    /// Point in the global frame expressed in this node's frame.
    pub fn point_to_local(&self, p: &Vec3) -> Vec3 {
        self.rotation.inverse_transform_vector(&(p - self.position))
    }

    /// Point in this node's frame expressed in the global frame.
    pub fn point_to_global(&self, p: &Vec3) -> Vec3 {
        self.rotation * p + self.position
    }

    /// Transform every vector of `event` into this node's frame.
    pub fn event_to_local(&self, event: &mut Event) {
        event.position = self.point_to_local(&event.position);
        event.motion = self.rotation.inverse_transform_vector(&event.motion);
        event.polarization = self.rotation.inverse_transform_vector(&event.polarization);
    }

    /// Transform every vector of `event` back to the global frame.
    pub fn event_to_global(&self, event: &mut Event) {
        event.position = self.point_to_global(&event.position);
        event.motion = self.rotation * event.motion;
        event.polarization = self.rotation * event.polarization;
    }
}
