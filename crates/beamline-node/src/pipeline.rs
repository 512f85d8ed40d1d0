//! The ordered component pipeline.
//!
//! [`Pipeline::new`] validates the node list once; the phase drivers
//! ([`Pipeline::initialize_all`], [`Pipeline::activate_all`],
//! [`Pipeline::save_all`], [`Pipeline::teardown_all`]) move every node
//! through its lifecycle; [`Pipeline::trace_event`] is the per-event hot
//! path and takes `&self` so any number of workers can share it.

use std::fmt;

use beamline_core::{Event, RestoreSet, TraceStatus};
use beamline_random::EventRng;
use indexmap::IndexMap;

use crate::component::Component;
use crate::context::{InitContext, InitOptions, SaveContext, SavedOutput, TraceContext};
use crate::error::{LifecycleError, PipelineError};
use crate::lifecycle::LifecycleState;
use crate::placement::Placement;
use crate::stats::{NodeStats, NodeStatsSnapshot};

// ── Nodes ──────────────────────────────────────────────────────────

/// A component together with where it sits. Input to [`Pipeline::new`].
pub struct Node {
    component: Box<dyn Component>,
    placement: Placement,
    relative: bool,
}

impl Node {
    /// Wrap a component placed at the global origin.
    pub fn new(component: impl Component) -> Self {
        Self::boxed(Box::new(component))
    }

    /// Wrap an already boxed component.
    pub fn boxed(component: Box<dyn Component>) -> Self {
        Self {
            component,
            placement: Placement::origin(),
            relative: false,
        }
    }

    /// Set the placement.
    pub fn at(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Interpret the placement relative to the previous node's.
    pub fn relative(mut self) -> Self {
        self.relative = true;
        self
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.component.name())
            .field("placement", &self.placement)
            .field("relative", &self.relative)
            .finish()
    }
}

struct Slot {
    component: Box<dyn Component>,
    placement: Placement,
    transform: bool,
    restore: RestoreSet,
    state: LifecycleState,
    stats: NodeStats,
}

// ── Outcomes ───────────────────────────────────────────────────────

/// How one event's pass through the pipeline ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// Every node was traversed.
    Completed,
    /// Node `node` absorbed the event.
    Absorbed {
        /// Position of the absorbing node.
        node: usize,
    },
    /// Node `node` left the event non-finite; it was dropped.
    Degenerate {
        /// Position of the offending node.
        node: usize,
    },
}

/// Result of [`Pipeline::trace_event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassReport {
    /// How the pass ended.
    pub outcome: PassOutcome,
    /// Interactions marked along the way.
    pub interactions: u32,
}

// ── Errors ─────────────────────────────────────────────────────────

fn validate_nodes(nodes: &[Node]) -> Result<(), PipelineError> {
    if nodes.is_empty() {
        return Err(PipelineError::EmptyPipeline);
    }
    let mut seen: IndexMap<&str, usize> = IndexMap::new();
    for (i, node) in nodes.iter().enumerate() {
        let name = node.component.name();
        if name.is_empty() {
            return Err(PipelineError::EmptyName { index: i });
        }
        if let Some(&first) = seen.get(name) {
            return Err(PipelineError::DuplicateName {
                name: name.to_string(),
                first,
                second: i,
            });
        }
        seen.insert(name, i);
    }
    Ok(())
}

fn check_output_names(outputs: &[SavedOutput]) -> Result<(), PipelineError> {
    let mut owners: IndexMap<&str, &str> = IndexMap::new();
    for output in outputs {
        if let Some(&first) = owners.get(output.filename.as_str()) {
            return Err(PipelineError::DuplicateOutput {
                filename: output.filename.clone(),
                first: first.to_string(),
                second: output.instance.clone(),
            });
        }
        owners.insert(&output.filename, &output.instance);
    }
    Ok(())
}

// ── Pipeline ───────────────────────────────────────────────────────

/// An ordered, validated list of components.
pub struct Pipeline {
    slots: Vec<Slot>,
    active: bool,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("nodes", &self.names().collect::<Vec<_>>())
            .field("active", &self.active)
            .finish()
    }
}

impl Pipeline {
    /// Validate `nodes` and build the pipeline.
    ///
    /// Checks that the list is non-empty and instance names are non-empty
    /// and unique. Relative placements are resolved against the previous
    /// node. A node whose restore set is not complete is accepted and
    /// logged at warn level.
    pub fn new(nodes: Vec<Node>) -> Result<Self, PipelineError> {
        validate_nodes(&nodes)?;

        let mut slots: Vec<Slot> = Vec::with_capacity(nodes.len());
        for node in nodes {
            let placement = match slots.last() {
                Some(prev) if node.relative => node.placement.relative_to(&prev.placement),
                _ => node.placement,
            };
            let restore = node.component.restore_fields();
            if !restore.is_complete() {
                tracing::warn!(
                    instance = node.component.name(),
                    missing = ?restore.missing(),
                    "component restores only part of the event state"
                );
            }
            slots.push(Slot {
                component: node.component,
                transform: !placement.is_identity(),
                placement,
                restore,
                state: LifecycleState::Uninitialized,
                stats: NodeStats::default(),
            });
        }
        Ok(Self {
            slots,
            active: false,
        })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: construction rejects empty pipelines.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Instance names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.component.name())
    }

    /// Absolute placement of node `index`.
    pub fn placement(&self, index: usize) -> Option<&Placement> {
        self.slots.get(index).map(|s| &s.placement)
    }

    /// Lifecycle state of node `index`.
    pub fn state(&self, index: usize) -> Option<LifecycleState> {
        self.slots.get(index).map(|s| s.state)
    }

    /// Restore set of node `index`.
    pub fn restore_fields(&self, index: usize) -> Option<RestoreSet> {
        self.slots.get(index).map(|s| s.restore)
    }

    /// The component at `index`.
    pub fn component(&self, index: usize) -> Option<&dyn Component> {
        self.slots.get(index).map(|s| s.component.as_ref())
    }

    /// Per-node counters.
    pub fn stats(&self) -> Vec<NodeStatsSnapshot> {
        self.slots
            .iter()
            .map(|s| s.stats.snapshot(s.component.name()))
            .collect()
    }

    // ── Phases ─────────────────────────────────────────────────────

    /// Initialize every node in order.
    ///
    /// Stops at the first failure, which names the instance. Nodes
    /// initialized before the failure stay initialized so that
    /// [`teardown_all`](Self::teardown_all) can release them.
    pub fn initialize_all(&mut self, options: &InitOptions) -> Result<(), PipelineError> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let next = slot.state.initialize(slot.component.name())?;
            let instance = slot.component.name().to_string();
            let ctx = InitContext::new(&instance, index, options);
            if let Err(source) = slot.component.initialize(&ctx) {
                tracing::error!(
                    instance = %instance,
                    index,
                    error = %source,
                    "component failed to initialize"
                );
                return Err(PipelineError::Initialize {
                    instance,
                    index,
                    source,
                });
            }
            slot.state = next;
            tracing::debug!(instance = %instance, index, "component initialized");
        }
        Ok(())
    }

    /// Open every node for events.
    pub fn activate_all(&mut self) -> Result<(), PipelineError> {
        for slot in &self.slots {
            slot.state.activate(slot.component.name())?;
        }
        for slot in &mut self.slots {
            slot.state = LifecycleState::Active;
        }
        self.active = true;
        Ok(())
    }

    /// Drive one event through every node.
    ///
    /// For each node: snapshot the event, convert it into the node's frame,
    /// trace, convert back, then act on the status. `Absorbed` stops the
    /// pass. `Restored` copies the node's restore set back from the
    /// snapshot, leaving earlier nodes' changes in place. An event that is
    /// no longer [physical](Event::is_physical) after a node is dropped as
    /// [`PassOutcome::Degenerate`].
    pub fn trace_event(
        &self,
        event: &mut Event,
        rng: &mut EventRng,
    ) -> Result<PassReport, LifecycleError> {
        if !self.active {
            return Err(self.inactive_error());
        }
        let mut ctx = TraceContext::new(rng);
        for (index, slot) in self.slots.iter().enumerate() {
            slot.stats.record_entry();
            let snapshot = *event;
            let before = ctx.interactions();

            if slot.transform {
                slot.placement.event_to_local(event);
            }
            let status = slot.component.trace(event, &mut ctx);
            if slot.transform {
                slot.placement.event_to_global(event);
            }
            slot.stats.record_status(status);
            slot.stats.record_interactions(ctx.interactions() - before);

            match status {
                TraceStatus::Absorbed => {
                    return Ok(PassReport {
                        outcome: PassOutcome::Absorbed { node: index },
                        interactions: ctx.interactions(),
                    });
                }
                TraceStatus::Restored => event.restore_from(&snapshot, slot.restore),
                TraceStatus::PassThrough | TraceStatus::Scattered => {}
            }

            if !event.is_physical() {
                slot.stats.record_degenerate();
                tracing::trace!(
                    instance = slot.component.name(),
                    event = ctx.event_index(),
                    "dropping non-finite event"
                );
                return Ok(PassReport {
                    outcome: PassOutcome::Degenerate { node: index },
                    interactions: ctx.interactions(),
                });
            }
        }
        Ok(PassReport {
            outcome: PassOutcome::Completed,
            interactions: ctx.interactions(),
        })
    }

    fn inactive_error(&self) -> LifecycleError {
        let slot = self
            .slots
            .iter()
            .find(|s| s.state != LifecycleState::Active)
            .unwrap_or(&self.slots[0]);
        LifecycleError {
            instance: slot.component.name().to_string(),
            operation: "trace",
            state: slot.state,
        }
    }

    /// Collect every node's output, in pipeline order.
    ///
    /// File names must be unique across the whole pipeline; a name reused
    /// by a later node fails with [`PipelineError::DuplicateOutput`].
    pub fn save_all(&mut self) -> Result<Vec<SavedOutput>, PipelineError> {
        self.active = false;
        let mut outputs = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let next = slot.state.save(slot.component.name())?;
            let instance = slot.component.name().to_string();
            let mut ctx = SaveContext::new(&instance);
            let saved = slot.component.save(&mut ctx);
            slot.state = next;
            if let Err(source) = saved {
                return Err(PipelineError::Save {
                    instance,
                    index,
                    source,
                });
            }
            let produced = ctx.into_outputs();
            tracing::debug!(instance = %instance, files = produced.len(), "component saved");
            outputs.extend(produced);
        }
        check_output_names(&outputs)?;
        Ok(outputs)
    }

    /// Release every node. Components whose initialize never succeeded
    /// are marked torn down without being called.
    pub fn teardown_all(&mut self) -> Result<(), PipelineError> {
        self.active = false;
        if let Some(slot) = self
            .slots
            .iter()
            .find(|s| s.state == LifecycleState::TornDown)
        {
            return Err(LifecycleError {
                instance: slot.component.name().to_string(),
                operation: "tear down",
                state: slot.state,
            }
            .into());
        }
        for slot in &mut self.slots {
            let held = slot.state.holds_resources();
            slot.state = LifecycleState::TornDown;
            if held {
                slot.component.teardown();
                tracing::debug!(instance = slot.component.name(), "component torn down");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComponentError;
    use beamline_core::{EventField, Vec3};
    use beamline_hist::{Axis, Histogram};
    use beamline_random::RunSeed;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // ── Test components ────────────────────────────────────────

    struct Pass(&'static str);
    impl Component for Pass {
        fn name(&self) -> &str {
            self.0
        }
        fn trace(&self, _e: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
            TraceStatus::PassThrough
        }
    }

    struct Absorb(&'static str);
    impl Component for Absorb {
        fn name(&self) -> &str {
            self.0
        }
        fn trace(&self, _e: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
            TraceStatus::Absorbed
        }
    }

    /// Moves the event 1 m in x and marks an interaction.
    struct Kick(&'static str);
    impl Component for Kick {
        fn name(&self) -> &str {
            self.0
        }
        fn trace(&self, e: &mut Event, ctx: &mut TraceContext<'_>) -> TraceStatus {
            e.position.x += 1.0;
            ctx.mark_interaction();
            TraceStatus::Scattered
        }
    }

    /// Scrambles every field, then asks to be undone.
    struct Scramble {
        name: &'static str,
        restore: RestoreSet,
    }
    impl Component for Scramble {
        fn name(&self) -> &str {
            self.name
        }
        fn trace(&self, e: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
            e.position = Vec3::new(9.0, 9.0, 9.0);
            e.motion = Vec3::new(0.0, 0.0, -1.0);
            e.time += 1.0;
            e.polarization = Vec3::x();
            e.weight *= 0.5;
            TraceStatus::Restored
        }
        fn restore_fields(&self) -> RestoreSet {
            self.restore
        }
    }

    struct Poison(&'static str);
    impl Component for Poison {
        fn name(&self) -> &str {
            self.0
        }
        fn trace(&self, e: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
            e.position.y = f64::NAN;
            TraceStatus::Scattered
        }
    }

    /// Propagates to its own z = 0 plane.
    struct Plane(&'static str);
    impl Component for Plane {
        fn name(&self) -> &str {
            self.0
        }
        fn trace(&self, e: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
            if e.propagate_to_plane(0.0) {
                TraceStatus::PassThrough
            } else {
                TraceStatus::Absorbed
            }
        }
    }

    /// Absorbs events not travelling along its local +z.
    struct Facing(&'static str);
    impl Component for Facing {
        fn name(&self) -> &str {
            self.0
        }
        fn trace(&self, e: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
            if e.motion.z > 0.5 * e.motion.norm() {
                TraceStatus::PassThrough
            } else {
                TraceStatus::Absorbed
            }
        }
    }

    struct Lifecycle {
        name: &'static str,
        fail: bool,
        teardowns: Arc<AtomicUsize>,
    }
    impl Component for Lifecycle {
        fn name(&self) -> &str {
            self.name
        }
        fn initialize(&mut self, ctx: &InitContext<'_>) -> Result<(), ComponentError> {
            if self.fail {
                return Err(ComponentError::invalid(format!(
                    "bad parameter in {}",
                    ctx.instance()
                )));
            }
            Ok(())
        }
        fn trace(&self, _e: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
            TraceStatus::PassThrough
        }
        fn teardown(&mut self) {
            self.teardowns.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ready(nodes: Vec<Node>) -> Pipeline {
        let mut p = Pipeline::new(nodes).unwrap();
        p.initialize_all(&InitOptions::default()).unwrap();
        p.activate_all().unwrap();
        p
    }

    fn photon() -> Event {
        Event::photon(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 5.0))
    }

    fn rng() -> EventRng {
        EventRng::new(RunSeed(7), 0)
    }

    // ── Validation ─────────────────────────────────────────────

    #[test]
    fn empty_pipeline_rejected() {
        assert!(matches!(
            Pipeline::new(vec![]),
            Err(PipelineError::EmptyPipeline)
        ));
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = Pipeline::new(vec![
            Node::new(Pass("a")),
            Node::new(Pass("b")),
            Node::new(Pass("a")),
        ])
        .unwrap_err();
        match err {
            PipelineError::DuplicateName {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "a");
                assert_eq!((first, second), (0, 2));
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(
            Pipeline::new(vec![Node::new(Pass("a")), Node::new(Pass(""))]),
            Err(PipelineError::EmptyName { index: 1 })
        ));
    }

    #[test]
    fn partial_restore_set_is_accepted() {
        let p = Pipeline::new(vec![Node::new(Scramble {
            name: "mon",
            restore: RestoreSet::ALL.without(EventField::Weight),
        })])
        .unwrap();
        assert!(!p.restore_fields(0).unwrap().is_complete());
    }

    // ── Status handling ────────────────────────────────────────

    #[test]
    fn pass_and_scatter_continue() {
        let p = ready(vec![Node::new(Pass("a")), Node::new(Kick("b")), Node::new(Kick("c"))]);
        let mut e = photon();
        let report = p.trace_event(&mut e, &mut rng()).unwrap();
        assert_eq!(report.outcome, PassOutcome::Completed);
        assert_eq!(report.interactions, 2);
        assert_eq!(e.position.x, 2.0);
        let stats = p.stats();
        assert_eq!(stats[0].pass_through, 1);
        assert_eq!(stats[1].scattered, 1);
        assert_eq!(stats[2].interactions, 1);
    }

    #[test]
    fn absorb_stops_the_pass() {
        let p = ready(vec![Node::new(Kick("a")), Node::new(Absorb("b")), Node::new(Kick("c"))]);
        let mut e = photon();
        let report = p.trace_event(&mut e, &mut rng()).unwrap();
        assert_eq!(report.outcome, PassOutcome::Absorbed { node: 1 });
        let stats = p.stats();
        assert_eq!(stats[1].absorbed, 1);
        assert_eq!(stats[2].entered, 0);
    }

    #[test]
    fn full_restore_is_field_complete() {
        let p = ready(vec![
            Node::new(Kick("before")),
            Node::new(Scramble {
                name: "mon",
                restore: RestoreSet::ALL,
            }),
        ]);
        let mut e = photon();
        e.polarization = Vec3::y();
        e.time = 0.25;
        p.trace_event(&mut e, &mut rng()).unwrap();
        let mut expected = photon();
        expected.polarization = Vec3::y();
        expected.time = 0.25;
        // The earlier node's mutation survives the restore.
        expected.position.x += 1.0;
        assert_eq!(e, expected);
    }

    #[test]
    fn partial_restore_leaves_missing_fields() {
        let p = ready(vec![Node::new(Scramble {
            name: "mon",
            restore: RestoreSet::ALL.without(EventField::Weight),
        })]);
        let mut e = photon();
        p.trace_event(&mut e, &mut rng()).unwrap();
        assert_eq!(e.position, photon().position);
        assert_eq!(e.weight, 0.5);
    }

    #[test]
    fn non_finite_event_is_dropped() {
        let p = ready(vec![Node::new(Poison("bad")), Node::new(Pass("after"))]);
        let mut e = photon();
        let report = p.trace_event(&mut e, &mut rng()).unwrap();
        assert_eq!(report.outcome, PassOutcome::Degenerate { node: 0 });
        let stats = p.stats();
        assert_eq!(stats[0].degenerate, 1);
        assert_eq!(stats[1].entered, 0);
    }

    // ── Placement ──────────────────────────────────────────────

    #[test]
    fn nodes_trace_in_local_frame() {
        let p = ready(vec![
            Node::new(Plane("first")).at(Placement::at(0.0, 0.0, 1.0)),
            Node::new(Plane("second"))
                .at(Placement::at(0.0, 0.0, 2.0))
                .relative(),
        ]);
        assert_eq!(p.placement(1).unwrap().position(), Vec3::new(0.0, 0.0, 3.0));
        let mut e = photon();
        let report = p.trace_event(&mut e, &mut rng()).unwrap();
        assert_eq!(report.outcome, PassOutcome::Completed);
        assert!((e.position.z - 3.0).abs() < 1e-12);
    }

    #[test]
    fn rotated_node_sees_rotated_direction() {
        // Rotated 90° about y, the node's local z axis points along global
        // x, so a photon moving along global z moves sideways locally.
        let p = ready(vec![
            Node::new(Facing("straight")),
            Node::new(Facing("side")).at(Placement::origin().rotated_deg(0.0, 90.0, 0.0)),
        ]);
        let mut e = photon();
        let report = p.trace_event(&mut e, &mut rng()).unwrap();
        assert_eq!(report.outcome, PassOutcome::Absorbed { node: 1 });
        // The event is handed back in the global frame.
        assert!((e.motion - photon().motion).norm() < 1e-12);
    }

    // ── Lifecycle ──────────────────────────────────────────────

    #[test]
    fn trace_before_activation_rejected() {
        let mut p = Pipeline::new(vec![Node::new(Pass("a"))]).unwrap();
        let err = p.trace_event(&mut photon(), &mut rng()).unwrap_err();
        assert_eq!(err.state, LifecycleState::Uninitialized);
        p.initialize_all(&InitOptions::default()).unwrap();
        let err = p.trace_event(&mut photon(), &mut rng()).unwrap_err();
        assert_eq!(err.state, LifecycleState::Initialized);
        assert_eq!(err.operation, "trace");
    }

    #[test]
    fn phases_run_once_in_order() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let mut p = Pipeline::new(vec![Node::new(Lifecycle {
            name: "a",
            fail: false,
            teardowns: Arc::clone(&teardowns),
        })])
        .unwrap();
        p.initialize_all(&InitOptions::default()).unwrap();
        assert!(matches!(
            p.initialize_all(&InitOptions::default()),
            Err(PipelineError::Lifecycle(_))
        ));
        p.activate_all().unwrap();
        assert_eq!(p.state(0), Some(LifecycleState::Active));
        assert!(p.save_all().unwrap().is_empty());
        assert_eq!(p.state(0), Some(LifecycleState::Finalizing));
        assert!(p.trace_event(&mut photon(), &mut rng()).is_err());
        assert!(p.save_all().is_err());
        p.teardown_all().unwrap();
        assert!(p.teardown_all().is_err());
        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
    }

    struct Emit(&'static str, &'static str);
    impl Component for Emit {
        fn name(&self) -> &str {
            self.0
        }
        fn trace(&self, _e: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
            TraceStatus::Restored
        }
        fn save(&self, ctx: &mut SaveContext<'_>) -> Result<(), ComponentError> {
            let h = Histogram::new_1d("h", Axis::new("x", 1, 0.0, 1.0))?;
            ctx.emit(self.1, h.snapshot())
        }
    }

    #[test]
    fn shared_output_name_across_nodes_rejected() {
        let mut p = ready(vec![
            Node::new(Emit("a", "det.dat")),
            Node::new(Emit("b", "other.dat")),
            Node::new(Emit("c", "det.dat")),
        ]);
        match p.save_all().unwrap_err() {
            PipelineError::DuplicateOutput {
                filename,
                first,
                second,
            } => {
                assert_eq!(filename, "det.dat");
                assert_eq!(first, "a");
                assert_eq!(second, "c");
            }
            other => panic!("unexpected error: {other}"),
        }
        p.teardown_all().unwrap();
    }

    #[test]
    fn failed_initialize_names_instance_and_tears_down_earlier_nodes() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let node = |name, fail| {
            Node::new(Lifecycle {
                name,
                fail,
                teardowns: Arc::clone(&teardowns),
            })
        };
        let mut p = Pipeline::new(vec![node("ok", false), node("broken", true), node("later", false)])
            .unwrap();
        let err = p.initialize_all(&InitOptions::default()).unwrap_err();
        match &err {
            PipelineError::Initialize {
                instance, index, ..
            } => {
                assert_eq!(instance, "broken");
                assert_eq!(*index, 1);
            }
            other => panic!("unexpected {other}"),
        }
        assert!(err.to_string().contains("broken"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(p.state(0), Some(LifecycleState::Initialized));
        assert_eq!(p.state(1), Some(LifecycleState::Uninitialized));

        p.teardown_all().unwrap();
        // Only the node that initialized is released.
        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
        assert_eq!(p.state(2), Some(LifecycleState::TornDown));
    }

    #[test]
    fn shared_across_threads() {
        let p = ready(vec![Node::new(Kick("a")), Node::new(Pass("b"))]);
        std::thread::scope(|s| {
            for t in 0..4u64 {
                let p = &p;
                s.spawn(move || {
                    for i in 0..250 {
                        let mut rng = EventRng::new(RunSeed(1), t * 1000 + i);
                        let mut e = photon();
                        p.trace_event(&mut e, &mut rng).unwrap();
                    }
                });
            }
        });
        assert_eq!(p.stats()[1].entered, 1000);
        assert_eq!(p.stats()[0].interactions, 1000);
    }
}
