//! Run driver for Beamline simulations.
//!
//! A [`Simulation`] owns a validated [`Pipeline`](beamline_node::Pipeline)
//! and a [`RunConfig`]. [`Simulation::run`] initializes every node, spreads
//! the event indices over a scoped worker pool, then saves, writes the
//! detector files and tears the nodes down. Every event draws from its own
//! random stream, so the result does not depend on the worker count.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod summary;

pub use cancel::CancelToken;
pub use config::{ConfigError, RunConfig};
pub use driver::Simulation;
pub use error::RunError;
pub use output::write_outputs;
pub use summary::RunSummary;
