//! Core types for the Beamline particle-trajectory engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! per-event state every component mutates, the restore field set, the
//! trace status directives, and the physical constants used to move
//! between energies, wavevectors and velocities.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constants;
pub mod event;
pub mod restore;
pub mod status;

pub use event::{Event, ParticleKind, Vec3};
pub use restore::{EventField, RestoreSet, RestoreSetIter};
pub use status::TraceStatus;
