//! Solid-angle importance sampling onto a rectangular target.
//!
//! Instead of drawing an isotropic direction and discarding everything
//! that misses a small downstream aperture, a focused source draws a point
//! uniformly over the aperture and carries the solid angle that point's
//! area element subtends as a weight factor.

use beamline_core::Vec3;

use crate::stream::EventRng;

/// A rectangle in space that a source aims at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetRect {
    center: Vec3,
    normal: Vec3,
    up: Vec3,
    right: Vec3,
    width: f64,
    height: f64,
}

impl TargetRect {
    /// Build a target from its centre, plane normal, in-plane "up"
    /// direction and full extents (metres).
    ///
    /// `up` is projected into the plane. Returns `None` if the extents are
    /// not finite and positive, the normal is zero, or `up` is parallel to
    /// the normal.
    pub fn new(center: Vec3, normal: Vec3, up: Vec3, width: f64, height: f64) -> Option<Self> {
        let valid = |x: f64| x.is_finite() && x > 0.0;
        if !valid(width) || !valid(height) || !center.iter().all(|c| c.is_finite()) {
            return None;
        }
        let normal = normal.try_normalize(f64::EPSILON)?;
        let up = (up - normal * normal.dot(&up)).try_normalize(1e-12)?;
        let right = up.cross(&normal);
        Some(Self {
            center,
            normal,
            up,
            right,
            width,
            height,
        })
    }

    /// A `width` × `height` rectangle on the +z axis at `distance`, facing
    /// the origin, with `up` along +y.
    pub fn facing(distance: f64, width: f64, height: f64) -> Option<Self> {
        if !distance.is_finite() {
            return None;
        }
        Self::new(
            Vec3::new(0.0, 0.0, distance),
            Vec3::z(),
            Vec3::y(),
            width,
            height,
        )
    }

    /// Centre of the rectangle.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Unit normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Full width along the in-plane "right" axis.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Full height along the in-plane "up" axis.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Area in square metres.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The point at fractional coordinates `(u, v)` in `[0, 1)²`.
    fn point_at(&self, u: f64, v: f64) -> Vec3 {
        self.center + self.right * (self.width * (u - 0.5)) + self.up * (self.height * (v - 0.5))
    }
}

/// One draw from [`sample_target_solid_angle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSample {
    /// Point on the target.
    pub point: Vec3,
    /// Unit direction from the origin to `point`.
    pub direction: Vec3,
    /// Distance from the origin to `point`.
    pub distance: f64,
    /// Differential solid angle `A·|cos θ| / r²` in steradians.
    pub solid_angle: f64,
}

/// Sample a point uniformly over `target` and weight it by the solid angle
/// the target's area subtends from `origin` at that point.
///
/// The mean of [`TargetSample::solid_angle`] over many draws converges to
/// the geometric solid angle of the rectangle. Returns `None` when the
/// sampled point coincides with the origin or the weight is not finite.
pub fn sample_target_solid_angle(
    rng: &mut EventRng,
    origin: &Vec3,
    target: &TargetRect,
) -> Option<TargetSample> {
    let u = rng.uniform01();
    let v = rng.uniform01();
    let point = target.point_at(u, v);
    let to_point = point - origin;
    let r2 = to_point.norm_squared();
    if r2 == 0.0 || !r2.is_finite() {
        return None;
    }
    let distance = r2.sqrt();
    let direction = to_point / distance;
    let cos_theta = target.normal.dot(&direction).abs();
    let solid_angle = target.area() * cos_theta / r2;
    if !solid_angle.is_finite() {
        return None;
    }
    Some(TargetSample {
        point,
        direction,
        distance,
        solid_angle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::RunSeed;
    use proptest::prelude::*;

    /// Solid angle of an `a` × `b` rectangle seen on-axis from distance `d`.
    fn rectangle_solid_angle(a: f64, b: f64, d: f64) -> f64 {
        4.0 * (a * b / ((a * a + 4.0 * d * d) * (b * b + 4.0 * d * d)).sqrt()).asin()
    }

    #[test]
    fn mean_weight_converges_to_solid_angle() {
        let target = TargetRect::facing(1.0, 1.0, 1.0).unwrap();
        let mut rng = EventRng::new(RunSeed(2024), 0);
        let n = 1_000_000;
        let mut sum = 0.0;
        for _ in 0..n {
            sum += sample_target_solid_angle(&mut rng, &Vec3::zeros(), &target)
                .unwrap()
                .solid_angle;
        }
        let mean = sum / n as f64;
        let exact = rectangle_solid_angle(1.0, 1.0, 1.0);
        assert!((exact - 0.805_4).abs() < 1e-3);
        assert!((mean - exact).abs() / exact < 0.01, "mean {mean} exact {exact}");
    }

    #[test]
    fn tilted_target_sees_less_solid_angle() {
        let tilted = TargetRect::new(
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::y(),
            0.2,
            0.2,
        )
        .unwrap();
        let straight = TargetRect::facing(2.0, 0.2, 0.2).unwrap();
        let mut rng = EventRng::new(RunSeed(1), 0);
        let mean = |t: &TargetRect, rng: &mut EventRng| {
            (0..20_000)
                .map(|_| {
                    sample_target_solid_angle(rng, &Vec3::zeros(), t)
                        .unwrap()
                        .solid_angle
                })
                .sum::<f64>()
                / 20_000.0
        };
        let a = mean(&tilted, &mut rng);
        let b = mean(&straight, &mut rng);
        assert!((a / b - std::f64::consts::FRAC_1_SQRT_2).abs() < 0.01);
    }

    #[test]
    fn samples_stay_on_target() {
        let target = TargetRect::facing(3.0, 0.4, 0.1).unwrap();
        let mut rng = EventRng::new(RunSeed(8), 0);
        for _ in 0..1000 {
            let s = sample_target_solid_angle(&mut rng, &Vec3::zeros(), &target).unwrap();
            assert_eq!(s.point.z, 3.0);
            assert!(s.point.x.abs() <= 0.2);
            assert!(s.point.y.abs() <= 0.05);
            assert!((s.direction.norm() - 1.0).abs() < 1e-12);
            assert!((s.point - s.direction * s.distance).norm() < 1e-12);
        }
    }

    #[test]
    fn degenerate_targets_are_rejected() {
        assert!(TargetRect::facing(1.0, 0.0, 1.0).is_none());
        assert!(TargetRect::facing(1.0, 1.0, -1.0).is_none());
        assert!(TargetRect::facing(f64::NAN, 1.0, 1.0).is_none());
        assert!(TargetRect::new(Vec3::z(), Vec3::zeros(), Vec3::y(), 1.0, 1.0).is_none());
        assert!(TargetRect::new(Vec3::z(), Vec3::y(), Vec3::y(), 1.0, 1.0).is_none());
    }

    #[test]
    fn origin_on_target_point_gives_none() {
        // A vanishingly small target centred on the origin: every sampled
        // point is the origin itself.
        let target = TargetRect::new(Vec3::zeros(), Vec3::z(), Vec3::y(), 1e-300, 1e-300).unwrap();
        let mut rng = EventRng::new(RunSeed(3), 0);
        assert!(sample_target_solid_angle(&mut rng, &Vec3::zeros(), &target).is_none());
    }

    proptest! {
        #[test]
        fn weight_never_exceeds_area_over_r2(
            seed in 0u64..1000,
            d in 0.1f64..10.0,
            w in 0.01f64..1.0,
            h in 0.01f64..1.0,
        ) {
            let target = TargetRect::facing(d, w, h).unwrap();
            let mut rng = EventRng::new(RunSeed(seed), 0);
            let s = sample_target_solid_angle(&mut rng, &Vec3::zeros(), &target).unwrap();
            prop_assert!(s.solid_angle > 0.0);
            prop_assert!(s.solid_angle <= w * h / (d * d) + 1e-12);
        }
    }
}
