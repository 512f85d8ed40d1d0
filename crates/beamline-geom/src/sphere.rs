//! Ray-sphere intersection (quadratic equation).

use beamline_core::Vec3;

use crate::roots::{solve_quadratic, Roots};
use crate::usable;

/// A sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    /// Centre.
    pub center: Vec3,
    /// Radius, metres.
    pub radius: f64,
}

impl Sphere {
    /// Sphere of `radius` centred at the origin.
    pub fn new(radius: f64) -> Self {
        Self {
            center: Vec3::zeros(),
            radius,
        }
    }
}

/// Intersect a ray with a sphere's surface.
///
/// Returns up to two roots sorted by `t`, including negative ones.
pub fn intersect_sphere(origin: &Vec3, direction: &Vec3, sphere: &Sphere) -> Roots {
    if !usable(direction) || !sphere.radius.is_finite() || sphere.radius <= 0.0 {
        return Roots::none();
    }
    let oc = origin - sphere.center;

    // |oc + t*d|² = r²
    let a = direction.dot(direction);
    let b = 2.0 * oc.dot(direction);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;
    solve_quadratic(a, b, c)
}
