//! Ray intersection with a finite, capped cylinder whose axis is along y.
//!
//! The y axis is the vertical axis of an instrument frame, so sample cans
//! and capillaries are upright cylinders. The result is the entry/exit
//! pair of the solid: the lateral surface clipped by the two end caps.

use beamline_core::Vec3;

use crate::roots::{solve_quadratic, Roots};
use crate::usable;

/// An upright cylinder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
    /// Centre of the cylinder (midway between the caps).
    pub center: Vec3,
    /// Radius, metres.
    pub radius: f64,
    /// Full height along y, metres.
    pub height: f64,
}

impl Cylinder {
    /// Cylinder centred at the origin.
    pub fn new(radius: f64, height: f64) -> Self {
        Self {
            center: Vec3::zeros(),
            radius,
            height,
        }
    }
}

/// Intersect a ray with a capped cylinder.
///
/// Returns the entry and exit parameters of the solid (two roots, or one
/// for a grazing touch), including negative ones. A ray parallel to the
/// axis that runs inside the radius enters and leaves through the caps.
pub fn intersect_cylinder(origin: &Vec3, direction: &Vec3, cylinder: &Cylinder) -> Roots {
    let r = cylinder.radius;
    let h = cylinder.height;
    if !usable(direction) || !r.is_finite() || r <= 0.0 || !h.is_finite() || h <= 0.0 {
        return Roots::none();
    }
    let o = origin - cylinder.center;
    let d = direction;

    // Lateral surface in the xz plane: |(o + t d)_xz|² = r²
    let a = d.x * d.x + d.z * d.z;
    let (mut t_in, mut t_out) = if a == 0.0 {
        // Parallel to the axis: inside the radius for all t, or never.
        if o.x * o.x + o.z * o.z >= r * r {
            return Roots::none();
        }
        (f64::NEG_INFINITY, f64::INFINITY)
    } else {
        let b = 2.0 * (o.x * d.x + o.z * d.z);
        let c = o.x * o.x + o.z * o.z - r * r;
        match solve_quadratic(a, b, c).entry_exit() {
            Some(pair) => pair,
            None => return Roots::none(),
        }
    };

    // Clip by the caps at y = ±h/2.
    let half = 0.5 * h;
    if d.y == 0.0 {
        if o.y < -half || o.y > half {
            return Roots::none();
        }
    } else {
        let t1 = (-half - o.y) / d.y;
        let t2 = (half - o.y) / d.y;
        t_in = t_in.max(t1.min(t2));
        t_out = t_out.min(t1.max(t2));
    }

    if t_out < t_in {
        return Roots::none();
    }
    if t_out == t_in {
        return Roots::one(t_in);
    }
    Roots::two(t_in, t_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lateral_entry_and_exit() {
        let o = Vec3::new(-10.0, 0.0, 0.0);
        let r = intersect_cylinder(&o, &Vec3::x(), &Cylinder::new(2.0, 1.0));
        assert_eq!(r.len(), 2);
        assert!((r.as_slice()[0] - 8.0).abs() < 1e-12);
        assert!((r.as_slice()[1] - 12.0).abs() < 1e-12);
    }

    #[test]
    fn above_the_cap_misses() {
        let o = Vec3::new(-10.0, 0.6, 0.0);
        assert!(intersect_cylinder(&o, &Vec3::x(), &Cylinder::new(2.0, 1.0)).is_empty());
    }

    #[test]
    fn along_axis_uses_caps() {
        let o = Vec3::new(0.5, -5.0, 0.0);
        let r = intersect_cylinder(&o, &Vec3::y(), &Cylinder::new(1.0, 2.0));
        assert_eq!(r.as_slice(), &[4.0, 6.0]);
    }

    #[test]
    fn along_axis_outside_radius_misses() {
        let o = Vec3::new(1.5, -5.0, 0.0);
        assert!(intersect_cylinder(&o, &Vec3::y(), &Cylinder::new(1.0, 2.0)).is_empty());
    }

    #[test]
    fn oblique_ray_exits_through_cap() {
        // Enters the side at x = -1, would leave the side at x = +1 but
        // reaches the top cap (y = 0.5) first at t = 1.5.
        let o = Vec3::new(-2.0, -1.0, 0.0);
        let d = Vec3::new(1.0, 1.0, 0.0);
        let r = intersect_cylinder(&o, &d, &Cylinder::new(1.0, 1.0));
        let (t_in, t_out) = r.entry_exit().unwrap();
        assert!((t_in - 1.0).abs() < 1e-12);
        assert!((t_out - 1.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_shapes_miss() {
        let o = Vec3::new(-10.0, 0.0, 0.0);
        assert!(intersect_cylinder(&o, &Vec3::x(), &Cylinder::new(0.0, 1.0)).is_empty());
        assert!(intersect_cylinder(&o, &Vec3::x(), &Cylinder::new(1.0, 0.0)).is_empty());
        assert!(intersect_cylinder(&o, &Vec3::zeros(), &Cylinder::new(1.0, 1.0)).is_empty());
    }

    proptest! {
        #[test]
        fn roots_are_finite_and_ordered(
            ox in -5.0f64..5.0, oy in -5.0f64..5.0, oz in -5.0f64..5.0,
            dx in -1.0f64..1.0, dy in -1.0f64..1.0, dz in -1.0f64..1.0,
        ) {
            let o = Vec3::new(ox, oy, oz);
            let d = Vec3::new(dx, dy, dz);
            let roots = intersect_cylinder(&o, &d, &Cylinder::new(1.0, 2.0));
            let s = roots.as_slice();
            prop_assert!(s.iter().all(|t| t.is_finite()));
            if s.len() == 2 {
                prop_assert!(s[0] <= s[1]);
                // The midpoint of the chord is inside the solid.
                let m = o + d * (0.5 * (s[0] + s[1]));
                prop_assert!(m.x * m.x + m.z * m.z <= 1.0 + 1e-9);
                prop_assert!(m.y.abs() <= 1.0 + 1e-9);
            }
        }
    }
}
