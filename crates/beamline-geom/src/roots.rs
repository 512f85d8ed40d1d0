//! The [`Roots`] result type and a guarded quadratic solver.

use smallvec::SmallVec;

/// Zero, one or two ray parameters, sorted ascending, all finite.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roots {
    values: SmallVec<[f64; 2]>,
}

impl Roots {
    /// No intersection.
    pub fn none() -> Self {
        Self::default()
    }

    /// A single (tangent or planar) intersection. Non-finite `t` yields none.
    pub fn one(t: f64) -> Self {
        let mut roots = Self::none();
        if t.is_finite() {
            roots.values.push(t);
        }
        roots
    }

    /// Two intersections, sorted. Any non-finite value yields none.
    pub fn two(a: f64, b: f64) -> Self {
        if !a.is_finite() || !b.is_finite() {
            return Self::none();
        }
        let mut roots = Self::none();
        if a <= b {
            roots.values.push(a);
            roots.values.push(b);
        } else {
            roots.values.push(b);
            roots.values.push(a);
        }
        roots
    }

    /// Number of roots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the ray misses.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Roots in ascending order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Smallest strictly positive root.
    pub fn first_positive(&self) -> Option<f64> {
        self.values.iter().copied().find(|&t| t > 0.0)
    }

    /// `(entry, exit)` for a closed shape; a single root is both.
    pub fn entry_exit(&self) -> Option<(f64, f64)> {
        match self.values.as_slice() {
            [] => None,
            [t] => Some((*t, *t)),
            [a, b, ..] => Some((*a, *b)),
        }
    }
}

/// Solve `a t² + b t + c = 0` without catastrophic cancellation.
///
/// A zero or non-finite `a`, or a negative discriminant, yields none.
pub(crate) fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    if a == 0.0 || !a.is_finite() || !b.is_finite() || !c.is_finite() {
        return Roots::none();
    }
    let disc = b * b - 4.0 * a * c;
    if !disc.is_finite() || disc < 0.0 {
        return Roots::none();
    }
    if disc == 0.0 {
        return Roots::one(-b / (2.0 * a));
    }
    let sqrt_disc = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_disc);
    if q == 0.0 {
        // b == 0 and c == 0: double root at zero.
        return Roots::one(0.0);
    }
    Roots::two(q / a, c / q)
}
