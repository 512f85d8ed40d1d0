//! Ray intersection primitives for Beamline components.
//!
//! Every routine takes a ray `origin + t * direction` and a shape, and
//! returns the ray parameters `t` at which the ray crosses the shape's
//! surface as [`Roots`]. The direction need not be unit length: with a
//! velocity the roots are times, with a unit vector they are distances.
//!
//! Roots may be negative (behind the origin). Choosing the useful one is
//! the caller's job; [`Roots::first_positive`] and [`Roots::entry_exit`]
//! cover the common cases. Degenerate input never produces NaN or
//! infinity; it produces an empty [`Roots`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cuboid;
pub mod cylinder;
pub mod plane;
pub mod roots;
pub mod sphere;

pub use cuboid::{intersect_box, Cuboid};
pub use cylinder::{intersect_cylinder, Cylinder};
pub use plane::{intersect_plane, Plane};
pub use roots::Roots;
pub use sphere::{intersect_sphere, Sphere};

use beamline_core::Vec3;

/// Evaluate the ray at parameter `t`: `origin + t * direction`.
#[inline]
pub fn point_at(origin: &Vec3, direction: &Vec3, t: f64) -> Vec3 {
    origin + direction * t
}

/// Whether a vector is finite and non-zero.
#[inline]
pub(crate) fn usable(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite()) && v.iter().any(|&c| c != 0.0)
}
