//! Histogram axes.

/// One histogram dimension: `bins` equal-width bins over `[min, max)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    /// Label written to detector files (quantity and unit).
    pub label: String,
    /// Number of bins.
    pub bins: usize,
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl Axis {
    /// Create an axis. Validation happens in
    /// [`Histogram::new`](crate::Histogram::new).
    pub fn new(label: impl Into<String>, bins: usize, min: f64, max: f64) -> Self {
        Self {
            label: label.into(),
            bins,
            min,
            max,
        }
    }

    /// Width of one bin.
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    /// Centre of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.min + (i as f64 + 0.5) * self.bin_width()
    }

    /// Bin containing `x`, or `None` if `x` is outside `[min, max)` or NaN.
    pub fn bin_of(&self, x: f64) -> Option<usize> {
        if !(x >= self.min && x < self.max) {
            return None;
        }
        let i = ((x - self.min) * self.bins as f64 / (self.max - self.min)).floor() as usize;
        // Rounding can land a value just below max in bin `bins`.
        Some(i.min(self.bins - 1))
    }
}
