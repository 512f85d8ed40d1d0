//! Test utilities and mock components for Beamline development.
//!
//! The mocks in this crate implement [`Component`] with trivial physics so
//! that engine and pipeline tests can check control flow: who saw which
//! event, when each lifecycle phase ran, and what happens on failure.
//! [`fixtures`] holds temporary directories and canned data tables.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use beamline_core::{Event, RestoreSet, TraceStatus, Vec3};
use beamline_node::{Component, ComponentError, InitContext, TraceContext};

/// Counters shared between a [`ProbeComponent`] and the test body.
#[derive(Debug, Default)]
pub struct Probe {
    pub initialized: AtomicU64,
    pub traced: AtomicU64,
    pub saved: AtomicU64,
    pub torn_down: AtomicU64,
}

impl Probe {
    pub fn initialized(&self) -> u64 {
        self.initialized.load(Ordering::Relaxed)
    }

    pub fn traced(&self) -> u64 {
        self.traced.load(Ordering::Relaxed)
    }

    pub fn saved(&self) -> u64 {
        self.saved.load(Ordering::Relaxed)
    }

    pub fn torn_down(&self) -> u64 {
        self.torn_down.load(Ordering::Relaxed)
    }
}

/// Passes every event through and counts lifecycle calls in a [`Probe`].
pub struct ProbeComponent {
    name: String,
    probe: Arc<Probe>,
}

impl ProbeComponent {
    pub fn new(name: impl Into<String>) -> (Self, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        (
            Self {
                name: name.into(),
                probe: Arc::clone(&probe),
            },
            probe,
        )
    }
}

impl Component for ProbeComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _ctx: &InitContext<'_>) -> Result<(), ComponentError> {
        self.probe.initialized.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn trace(&self, _event: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
        self.probe.traced.fetch_add(1, Ordering::Relaxed);
        TraceStatus::PassThrough
    }

    fn save(&self, _ctx: &mut beamline_node::SaveContext<'_>) -> Result<(), ComponentError> {
        self.probe.saved.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn teardown(&mut self) {
        self.probe.torn_down.fetch_add(1, Ordering::Relaxed);
    }
}

/// Emits a unit-weight photon along +z from a position drawn uniformly in
/// the unit square, so that downstream nodes see distinct, seeded events.
pub struct UniformEmitter {
    pub name: String,
}

impl UniformEmitter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Component for UniformEmitter {
    fn name(&self) -> &str {
        &self.name
    }

    fn trace(&self, event: &mut Event, ctx: &mut TraceContext<'_>) -> TraceStatus {
        let rng = ctx.rng();
        let position = Vec3::new(rng.uniform_pm1() * 0.5, rng.uniform_pm1() * 0.5, -1.0);
        *event = Event::photon(position, Vec3::new(0.0, 0.0, 4.0));
        TraceStatus::PassThrough
    }
}

/// Absorbs every event whose index is a multiple of `every`.
pub struct AbsorbEvery {
    pub name: String,
    pub every: u64,
}

impl AbsorbEvery {
    pub fn new(name: impl Into<String>, every: u64) -> Self {
        Self {
            name: name.into(),
            every: every.max(1),
        }
    }
}

impl Component for AbsorbEvery {
    fn name(&self) -> &str {
        &self.name
    }

    fn trace(&self, _event: &mut Event, ctx: &mut TraceContext<'_>) -> TraceStatus {
        if ctx.event_index() % self.every == 0 {
            TraceStatus::Absorbed
        } else {
            TraceStatus::PassThrough
        }
    }
}

/// Fails to initialize with a fixed reason.
pub struct FailingInit {
    pub name: String,
    pub reason: String,
}

impl FailingInit {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl Component for FailingInit {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _ctx: &InitContext<'_>) -> Result<(), ComponentError> {
        Err(ComponentError::invalid(self.reason.clone()))
    }

    fn trace(&self, _event: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
        TraceStatus::PassThrough
    }
}

/// Scrambles every field of the event and returns `Restored`, restoring
/// only the fields in `restore`.
pub struct Scrambler {
    pub name: String,
    pub restore: RestoreSet,
}

impl Scrambler {
    pub fn new(name: impl Into<String>, restore: RestoreSet) -> Self {
        Self {
            name: name.into(),
            restore,
        }
    }
}

impl Component for Scrambler {
    fn name(&self) -> &str {
        &self.name
    }

    fn trace(&self, event: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
        event.position += Vec3::new(1.0, 2.0, 3.0);
        event.motion *= 2.0;
        event.time += 1.0;
        event.polarization = Vec3::x();
        event.weight *= 0.5;
        TraceStatus::Restored
    }

    fn restore_fields(&self) -> RestoreSet {
        self.restore
    }
}

/// Sets the weight of every `every`-th event to NaN.
pub struct Poison {
    pub name: String,
    pub every: u64,
}

impl Poison {
    pub fn new(name: impl Into<String>, every: u64) -> Self {
        Self {
            name: name.into(),
            every: every.max(1),
        }
    }
}

impl Component for Poison {
    fn name(&self) -> &str {
        &self.name
    }

    fn trace(&self, event: &mut Event, ctx: &mut TraceContext<'_>) -> TraceStatus {
        if ctx.event_index() % self.every == 0 {
            event.weight = f64::NAN;
        }
        TraceStatus::Scattered
    }
}

/// Sleeps for `delay` per event. For cancellation and time-budget tests.
pub struct Slow {
    pub name: String,
    pub delay: Duration,
}

impl Slow {
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }
}

impl Component for Slow {
    fn name(&self) -> &str {
        &self.name
    }

    fn trace(&self, _event: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
        std::thread::sleep(self.delay);
        TraceStatus::PassThrough
    }
}
