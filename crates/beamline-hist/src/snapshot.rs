//! Immutable histogram contents.

use crate::axis::Axis;

/// A point-in-time copy of a [`Histogram`](crate::Histogram).
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramSnapshot {
    title: String,
    axes: Vec<Axis>,
    counts: Vec<u64>,
    intensity: Vec<f64>,
    intensity_sq: Vec<f64>,
}

impl HistogramSnapshot {
    pub(crate) fn new(
        title: String,
        axes: Vec<Axis>,
        counts: Vec<u64>,
        intensity: Vec<f64>,
        intensity_sq: Vec<f64>,
    ) -> Self {
        Self {
            title,
            axes,
            counts,
            intensity,
            intensity_sq,
        }
    }

    /// Histogram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The axes, in order.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Bins per axis.
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.bins).collect()
    }

    /// Entry counts, row-major.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Weight sums, row-major.
    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    /// Squared-weight sums, row-major.
    pub fn intensity_sq(&self) -> &[f64] {
        &self.intensity_sq
    }

    /// Statistical error per cell: `sqrt(sum of w²)`.
    pub fn errors(&self) -> Vec<f64> {
        self.intensity_sq.iter().map(|s| s.sqrt()).collect()
    }

    /// Sum of all counts.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Sum of all weights.
    pub fn total_intensity(&self) -> f64 {
        self.intensity.iter().sum()
    }

    /// Statistical error of the total intensity.
    pub fn total_error(&self) -> f64 {
        self.intensity_sq.iter().sum::<f64>().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Axis, Histogram};

    #[test]
    fn errors_are_root_of_squared_weights() {
        let h = Histogram::new_1d("e", Axis::new("E [keV]", 2, 0.0, 2.0)).unwrap();
        h.add(3.0, &[0.5]);
        h.add(4.0, &[0.5]);
        h.add(2.0, &[1.5]);
        let s = h.snapshot();
        assert_eq!(s.errors(), vec![5.0, 2.0]);
        assert_eq!(s.total_intensity(), 9.0);
        assert_eq!(s.total_count(), 3);
        assert!((s.total_error() - 29f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.shape(), vec![2]);
    }
}
