//! The shared weighted histogram.

use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::atomic::AtomicF64;
use crate::axis::Axis;
use crate::error::HistogramError;
use crate::snapshot::HistogramSnapshot;

/// Highest supported rank.
pub const MAX_RANK: usize = 3;

/// Per-axis bin indices of one cell.
pub type BinIndex = SmallVec<[usize; MAX_RANK]>;

#[derive(Debug, Default)]
struct Cell {
    count: AtomicU64,
    weight: AtomicF64,
    weight_sq: AtomicF64,
}

/// A fixed-shape weighted histogram, safe to fill from many threads.
///
/// Cells are stored row-major with axis 0 varying slowest.
#[derive(Debug)]
pub struct Histogram {
    title: String,
    axes: Vec<Axis>,
    strides: BinIndex,
    cells: Box<[Cell]>,
}

impl Histogram {
    /// Create an empty histogram with the given axes.
    pub fn new(title: impl Into<String>, axes: Vec<Axis>) -> Result<Self, HistogramError> {
        if axes.is_empty() {
            return Err(HistogramError::NoAxes);
        }
        if axes.len() > MAX_RANK {
            return Err(HistogramError::TooManyAxes { rank: axes.len() });
        }
        for (i, axis) in axes.iter().enumerate() {
            if axis.bins == 0 {
                return Err(HistogramError::ZeroBins { axis: i });
            }
            if !axis.min.is_finite() || !axis.max.is_finite() || axis.max <= axis.min {
                return Err(HistogramError::InvalidRange {
                    axis: i,
                    min: axis.min,
                    max: axis.max,
                });
            }
        }

        let mut strides: BinIndex = SmallVec::from_elem(1, axes.len());
        let mut total = 1usize;
        for i in (0..axes.len()).rev() {
            strides[i] = total;
            total = total
                .checked_mul(axes[i].bins)
                .ok_or(HistogramError::TooManyCells)?;
        }
        let cells = (0..total).map(|_| Cell::default()).collect();

        Ok(Self {
            title: title.into(),
            axes,
            strides,
            cells,
        })
    }

    /// Convenience constructor for a 1-D histogram.
    pub fn new_1d(title: impl Into<String>, axis: Axis) -> Result<Self, HistogramError> {
        Self::new(title, vec![axis])
    }

    /// Convenience constructor for a 2-D histogram.
    pub fn new_2d(title: impl Into<String>, x: Axis, y: Axis) -> Result<Self, HistogramError> {
        Self::new(title, vec![x, y])
    }

    /// Title written to detector files.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The axes, in order.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.axes.len()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Per-axis bin indices for `coords`, or `None` if the arity is wrong
    /// or any coordinate falls outside its axis.
    pub fn bin_index(&self, coords: &[f64]) -> Option<BinIndex> {
        if coords.len() != self.axes.len() {
            return None;
        }
        self.axes
            .iter()
            .zip(coords)
            .map(|(axis, &x)| axis.bin_of(x))
            .collect()
    }

    fn flat_index(&self, coords: &[f64]) -> Option<usize> {
        if coords.len() != self.axes.len() {
            return None;
        }
        let mut flat = 0;
        for ((axis, &x), stride) in self.axes.iter().zip(coords).zip(&self.strides) {
            flat += axis.bin_of(x)? * stride;
        }
        Some(flat)
    }

    /// Record one weighted entry at `coords`.
    ///
    /// Silently ignores the entry (returning `false`) when a coordinate is
    /// outside `[min, max)` on its axis, the number of coordinates does not
    /// match the rank, or the weight is negative or not finite.
    pub fn add(&self, weight: f64, coords: &[f64]) -> bool {
        if !weight.is_finite() || weight < 0.0 {
            return false;
        }
        let Some(flat) = self.flat_index(coords) else {
            return false;
        };
        let cell = &self.cells[flat];
        cell.count.fetch_add(1, Ordering::Relaxed);
        cell.weight.fetch_add(weight, Ordering::Relaxed);
        cell.weight_sq.fetch_add(weight * weight, Ordering::Relaxed);
        true
    }

    /// Clear every cell.
    pub fn reset(&self) {
        for cell in self.cells.iter() {
            cell.count.store(0, Ordering::Relaxed);
            cell.weight.store(0.0, Ordering::Relaxed);
            cell.weight_sq.store(0.0, Ordering::Relaxed);
        }
    }

    /// Copy the current contents.
    ///
    /// Taken while other threads are still adding, the copy may split an
    /// entry across fields of one cell; take it after the run's workers
    /// have been joined.
    pub fn snapshot(&self) -> HistogramSnapshot {
        let n = self.cells.len();
        let mut counts = Vec::with_capacity(n);
        let mut intensity = Vec::with_capacity(n);
        let mut intensity_sq = Vec::with_capacity(n);
        for cell in self.cells.iter() {
            counts.push(cell.count.load(Ordering::Relaxed));
            intensity.push(cell.weight.load(Ordering::Relaxed));
            intensity_sq.push(cell.weight_sq.load(Ordering::Relaxed));
        }
        HistogramSnapshot::new(
            self.title.clone(),
            self.axes.clone(),
            counts,
            intensity,
            intensity_sq,
        )
    }
}
