//! Reference components for Beamline.
//!
//! A small library of nodes that exercise the whole engine: a focused
//! source, an aperture, an attenuating filter, a Bragg crystal and two
//! monitors. A typical pipeline:
//!
//! 1. [`PointSource`] emits an event focused onto the next aperture
//! 2. [`Slit`] / [`Filter`] / [`CrystalReflector`] shape the beam
//! 3. [`PsdMonitor`] and [`EnergyMonitor`] record it and restore it
//!
//! Every component is configured through a builder (or a validating
//! constructor) and loads its data files at initialize.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod crystal;
pub mod energy_monitor;
pub mod filter;
pub mod point_source;
pub mod psd_monitor;
pub mod slit;

pub use crystal::{ChannelReflectivity, CrystalReflector, CrystalReflectorBuilder};
pub use energy_monitor::EnergyMonitor;
pub use filter::{AttenuationColumn, Filter, FilterBuilder};
pub use point_source::{EnergySpectrum, PointSource, PointSourceBuilder};
pub use psd_monitor::{PsdMonitor, PsdMonitorBuilder};
pub use slit::{Slit, SlitShape};
