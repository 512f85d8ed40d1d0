//! Components, their lifecycle, and the pipeline that drives events
//! through them.
//!
//! A [`Component`] is one unit of beamline physics. The [`Pipeline`]
//! owns an ordered list of components, each wrapped with its
//! [`Placement`], lifecycle state and statistics, and provides the single
//! entry point the run driver calls per event: [`Pipeline::trace_event`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod component;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod pipeline;
pub mod placement;
pub mod stats;

pub use component::Component;
pub use context::{InitContext, InitOptions, SaveContext, SavedOutput, TraceContext};
pub use error::{ComponentError, LifecycleError, PipelineError};
pub use lifecycle::LifecycleState;
pub use pipeline::{Node, PassOutcome, PassReport, Pipeline};
pub use placement::Placement;
pub use stats::{NodeStats, NodeStatsSnapshot};
