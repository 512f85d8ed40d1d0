//! Ray-box intersection (slab method).

use beamline_core::Vec3;

use crate::roots::Roots;
use crate::usable;

/// An axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    /// Centre of the box.
    pub center: Vec3,
    /// Full extents along x, y and z.
    pub size: Vec3,
}

impl Cuboid {
    /// Box of the given full extents centred at the origin.
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            center: Vec3::zeros(),
            size: Vec3::new(width, height, depth),
        }
    }
}

/// Intersect a ray with an axis-aligned box.
///
/// Returns the entry and exit parameters (one root when the ray only
/// grazes an edge), including negative ones. Axes along which the ray does
/// not move are handled without dividing by zero.
pub fn intersect_box(origin: &Vec3, direction: &Vec3, cuboid: &Cuboid) -> Roots {
    if !usable(direction)
        || !cuboid.size.iter().all(|s| s.is_finite() && *s > 0.0)
        || !cuboid.center.iter().all(|c| c.is_finite())
    {
        return Roots::none();
    }
    let o = origin - cuboid.center;
    let half = cuboid.size * 0.5;

    let mut t_in = f64::NEG_INFINITY;
    let mut t_out = f64::INFINITY;
    for axis in 0..3 {
        let d = direction[axis];
        let lo = -half[axis];
        let hi = half[axis];
        if d == 0.0 {
            if o[axis] < lo || o[axis] > hi {
                return Roots::none();
            }
            continue;
        }
        let t1 = (lo - o[axis]) / d;
        let t2 = (hi - o[axis]) / d;
        t_in = t_in.max(t1.min(t2));
        t_out = t_out.min(t1.max(t2));
        if t_out < t_in {
            return Roots::none();
        }
    }

    if t_out == t_in {
        return Roots::one(t_in);
    }
    Roots::two(t_in, t_out)
}
