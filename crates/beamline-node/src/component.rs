//! The [`Component`] trait.

use beamline_core::{Event, RestoreSet, TraceStatus};

use crate::context::{InitContext, SaveContext, TraceContext};
use crate::error::ComponentError;

/// One unit of beamline physics: a source, optic, sample or detector.
///
/// # Contract
///
/// - `initialize` runs once before any event. Load tables and build
///   histograms here; a returned error aborts the whole run.
/// - `trace` runs once per event, concurrently from many threads, in the
///   node's local frame. It may only mutate node state through atomics
///   (histograms). The returned [`TraceStatus`] tells the pipeline what
///   to do next.
/// - `save` runs once after the last event and hands detector contents to
///   the [`SaveContext`].
/// - `teardown` runs once at the end, even if a later node failed to
///   initialize.
///
/// # Object safety
///
/// The pipeline stores components as `Box<dyn Component>`.
///
/// # Examples
///
/// A component that absorbs everything outside a 1 cm half-width in x:
///
/// ```
/// use beamline_core::{Event, TraceStatus};
/// use beamline_node::{Component, TraceContext};
///
/// struct Jaw;
///
/// impl Component for Jaw {
///     fn name(&self) -> &str { "jaw" }
///
///     fn trace(&self, event: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
///         if !event.propagate_to_plane(0.0) || event.position.x.abs() > 0.01 {
///             return TraceStatus::Absorbed;
///         }
///         TraceStatus::PassThrough
///     }
/// }
///
/// assert_eq!(Jaw.name(), "jaw");
/// ```
pub trait Component: Send + Sync + 'static {
    /// Instance name, unique within a pipeline. Used in logs, errors and
    /// output file headers.
    fn name(&self) -> &str;

    /// Prepare private state.
    ///
    /// Default: nothing to prepare.
    fn initialize(&mut self, _ctx: &InitContext<'_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Process one event in the node's local frame.
    fn trace(&self, event: &mut Event, ctx: &mut TraceContext<'_>) -> TraceStatus;

    /// Hand output to the save context.
    ///
    /// Default: no output.
    fn save(&self, _ctx: &mut SaveContext<'_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Release private state.
    ///
    /// Default: nothing to release.
    fn teardown(&mut self) {}

    /// Fields copied back from the pre-trace snapshot when `trace`
    /// returns [`TraceStatus::Restored`].
    ///
    /// Default: [`RestoreSet::ALL`].
    fn restore_fields(&self) -> RestoreSet {
        RestoreSet::ALL
    }
}
