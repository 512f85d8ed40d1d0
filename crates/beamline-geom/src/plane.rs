//! Ray-plane intersection.

use beamline_core::Vec3;

use crate::roots::Roots;
use crate::usable;

/// An infinite plane through `point` with normal `normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Any point on the plane.
    pub point: Vec3,
    /// Plane normal. Need not be unit length, must be non-zero.
    pub normal: Vec3,
}

impl Plane {
    /// Create a plane from a point and a normal.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// The plane `z = z0`.
    pub fn z(z0: f64) -> Self {
        Self::new(Vec3::new(0.0, 0.0, z0), Vec3::z())
    }

    /// The plane `y = y0`.
    pub fn y(y0: f64) -> Self {
        Self::new(Vec3::new(0.0, y0, 0.0), Vec3::y())
    }
}

/// Intersect a ray with a plane.
///
/// One root if the ray crosses the plane (at any sign of `t`); none if the
/// ray is parallel to it, the normal or direction is degenerate, or the
/// parameter is not finite.
pub fn intersect_plane(origin: &Vec3, direction: &Vec3, plane: &Plane) -> Roots {
    if !usable(direction) || !usable(&plane.normal) {
        return Roots::none();
    }
    let denom = plane.normal.dot(direction);
    if denom == 0.0 || !denom.is_finite() {
        return Roots::none();
    }
    Roots::one(plane.normal.dot(&(plane.point - origin)) / denom)
}
