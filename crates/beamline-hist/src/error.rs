//! Histogram construction errors.

use std::error::Error;
use std::fmt;

/// Invalid histogram shape.
#[derive(Clone, Debug, PartialEq)]
pub enum HistogramError {
    /// No axes were given.
    NoAxes,
    /// More axes than [`MAX_RANK`](crate::MAX_RANK).
    TooManyAxes {
        /// Number of axes given.
        rank: usize,
    },
    /// An axis has zero bins.
    ZeroBins {
        /// Axis position.
        axis: usize,
    },
    /// An axis range is not finite or not increasing.
    InvalidRange {
        /// Axis position.
        axis: usize,
        /// Lower bound given.
        min: f64,
        /// Upper bound given.
        max: f64,
    },
    /// The total number of cells does not fit in memory.
    TooManyCells,
}

impl fmt::Display for HistogramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAxes => write!(f, "histogram needs at least one axis"),
            Self::TooManyAxes { rank } => {
                write!(f, "histogram rank {rank} exceeds {}", crate::MAX_RANK)
            }
            Self::ZeroBins { axis } => write!(f, "axis {axis} has zero bins"),
            Self::InvalidRange { axis, min, max } => {
                write!(f, "axis {axis} range [{min}, {max}) is empty or not finite")
            }
            Self::TooManyCells => write!(f, "histogram cell count overflows"),
        }
    }
}

impl Error for HistogramError {}
