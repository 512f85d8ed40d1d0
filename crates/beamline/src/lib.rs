//! Beamline: a Monte Carlo ray-tracing engine for X-ray and neutron
//! instruments.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Beamline sub-crates. For most users, adding `beamline` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use beamline::prelude::*;
//!
//! let source = PointSource::builder("source")
//!     .energy(8.0, 9.0)
//!     .focus(TargetRect::facing(2.0, 0.01, 0.01).unwrap())
//!     .build()
//!     .unwrap();
//! let slit = Slit::rect("slit", 0.005, 0.005).unwrap();
//! let psd = PsdMonitor::builder("psd")
//!     .size(0.01, 0.01)
//!     .bins(20, 20)
//!     .build()
//!     .unwrap();
//!
//! let mut sim = Simulation::new(
//!     RunConfig::with_events(10_000).seed(42),
//!     vec![
//!         Node::new(source),
//!         Node::new(slit).at(Placement::at(0.0, 0.0, 2.0)),
//!         Node::new(psd).at(Placement::at(0.0, 0.0, 3.0)),
//!     ],
//! )
//! .unwrap();
//! let summary = sim.run().unwrap();
//! let image = &summary.output("psd", "psd.psd").unwrap().snapshot;
//! assert_eq!(image.total_count(), summary.completed);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`event`] | `beamline-core` | `Event`, trace statuses, restore sets, constants |
//! | [`geom`] | `beamline-geom` | Ray intersections with planes, spheres, cylinders, boxes |
//! | [`random`] | `beamline-random` | Per-event random streams, solid-angle sampling |
//! | [`table`] | `beamline-table` | Tabulated material data |
//! | [`hist`] | `beamline-hist` | Concurrent weighted histograms, detector files |
//! | [`node`] | `beamline-node` | Component trait, lifecycle, pipeline |
//! | [`engine`] | `beamline-engine` | Run configuration and parallel driver |
//! | [`components`] | `beamline-components` | Reference sources, optics and monitors |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Per-event state and control directives (`beamline-core`).
pub use beamline_core as event;

/// Ray intersection primitives (`beamline-geom`).
pub use beamline_geom as geom;

/// Random variates and importance sampling (`beamline-random`).
///
/// Every event draws from its own stream, keyed by
/// [`random::RunSeed`] and the event index.
pub use beamline_random as random;

/// Tabulated data (`beamline-table`).
pub use beamline_table as table;

/// Weighted histograms and the detector text format (`beamline-hist`).
pub use beamline_hist as hist;

/// The [`node::Component`] trait and the pipeline (`beamline-node`).
pub use beamline_node as node;

/// Run driver (`beamline-engine`).
pub use beamline_engine as engine;

/// Reference components (`beamline-components`).
pub use beamline_components as components;

/// Common imports for typical Beamline usage.
///
/// ```rust
/// use beamline::prelude::*;
/// ```
pub mod prelude {
    // Event state
    pub use beamline_core::{Event, EventField, ParticleKind, RestoreSet, TraceStatus, Vec3};

    // Sampling and data
    pub use beamline_hist::{Axis, Histogram, HistogramSnapshot};
    pub use beamline_random::{EventRng, RunSeed, TargetRect};
    pub use beamline_table::Table;

    // Components and pipeline
    pub use beamline_node::{
        Component, ComponentError, InitContext, Node, Placement, SaveContext, TraceContext,
    };

    // Engine
    pub use beamline_engine::{CancelToken, RunConfig, RunError, RunSummary, Simulation};

    // Reference components
    pub use beamline_components::{
        CrystalReflector, EnergyMonitor, Filter, PointSource, PsdMonitor, Slit,
    };
}
