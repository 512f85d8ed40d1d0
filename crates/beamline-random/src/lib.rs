//! Reproducible random variates for Beamline components.
//!
//! Every event draws from its own ChaCha8 stream, keyed by the run seed
//! and the event index ([`EventStreams`]). The draw index is the stream's
//! word position. A run therefore produces the same numbers for the same
//! event no matter which worker traces it or in which order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod stream;
pub mod target;

pub use stream::{EventRng, EventStreams, RunSeed};
pub use target::{sample_target_solid_angle, TargetRect, TargetSample};
