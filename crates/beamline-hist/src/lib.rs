//! Concurrent weighted histograms for Beamline detectors.
//!
//! A [`Histogram`] is shared by every worker thread of a run. Each cell
//! keeps an event count, a weight sum and a sum of squared weights, all
//! updated with per-cell atomics; there is no lock. After the run a
//! [`HistogramSnapshot`] is taken and rendered as a [`DetectorFile`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod atomic;
pub mod axis;
pub mod error;
pub mod histogram;
pub mod output;
pub mod snapshot;

pub use atomic::AtomicF64;
pub use axis::Axis;
pub use error::HistogramError;
pub use histogram::{BinIndex, Histogram, MAX_RANK};
pub use output::DetectorFile;
pub use snapshot::HistogramSnapshot;
