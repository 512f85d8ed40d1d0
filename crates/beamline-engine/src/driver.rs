//! The simulation driver and its worker pool.
//!
//! Workers are scoped threads that share `&Pipeline`. The driving thread
//! splits `0..events` into contiguous chunks and feeds them through a
//! bounded crossbeam channel; each worker traces every event of a chunk
//! with that event's own random stream, checking the cancel token before
//! each event.

use std::ops::Range;
use std::thread;
use std::time::Instant;

use beamline_core::{Event, ParticleKind};
use beamline_node::{InitOptions, LifecycleError, Node, PassOutcome, Pipeline};
use beamline_random::{EventStreams, RunSeed};
use crossbeam_channel::Receiver;

use crate::cancel::CancelToken;
use crate::config::RunConfig;
use crate::error::RunError;
use crate::output::write_outputs;
use crate::summary::RunSummary;

/// A configured pipeline ready to run once.
#[derive(Debug)]
pub struct Simulation {
    config: RunConfig,
    pipeline: Pipeline,
    cancel: CancelToken,
}

#[derive(Clone, Copy, Debug, Default)]
struct WorkerTally {
    traced: u64,
    completed: u64,
    absorbed: u64,
    degenerate: u64,
    interactions: u64,
}

impl WorkerTally {
    fn merge(&mut self, other: &WorkerTally) {
        self.traced += other.traced;
        self.completed += other.completed;
        self.absorbed += other.absorbed;
        self.degenerate += other.degenerate;
        self.interactions += other.interactions;
    }
}

impl Simulation {
    /// Validate `config` and build the pipeline from `nodes`.
    pub fn new(config: RunConfig, nodes: Vec<Node>) -> Result<Self, RunError> {
        config.validate()?;
        let pipeline = Pipeline::new(nodes)?;
        Ok(Self {
            config,
            pipeline,
            cancel: CancelToken::new(),
        })
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The pipeline, for inspecting components and counters.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// A token that stops the run early when cancelled.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Initialize, trace every event, save, write outputs and tear down.
    ///
    /// A failed initialization tears down the nodes that did initialize
    /// and returns the error naming the failing instance. Cancellation is
    /// not an error: the summary reports it and the outputs cover the
    /// events traced before the stop.
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        let workers = self.config.resolved_worker_count();
        tracing::info!(
            events = self.config.events,
            seed = self.config.seed,
            workers,
            nodes = self.pipeline.len(),
            "starting run"
        );

        let options = InitOptions {
            data_dir: self.config.data_dir.clone(),
            planned_events: self.config.events,
        };
        if let Err(e) = self.pipeline.initialize_all(&options) {
            if let Err(teardown) = self.pipeline.teardown_all() {
                tracing::warn!(error = %teardown, "teardown after failed initialization");
            }
            return Err(e.into());
        }
        let outcome = self
            .pipeline
            .activate_all()
            .map_err(RunError::from)
            .and_then(|()| self.trace_and_save(workers));
        let teardown = self.pipeline.teardown_all();
        let summary = match (outcome, teardown) {
            (Ok(summary), Ok(())) => summary,
            (Ok(_), Err(e)) => return Err(e.into()),
            (Err(e), teardown) => {
                if let Err(t) = teardown {
                    tracing::warn!(error = %t, "teardown after failed run");
                }
                return Err(e);
            }
        };
        tracing::info!(
            traced = summary.traced,
            completed = summary.completed,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            rate = summary.events_per_second(),
            "run finished"
        );
        Ok(summary)
    }

    fn trace_and_save(&mut self, workers: usize) -> Result<RunSummary, RunError> {
        let started = Instant::now();
        let tally = self.trace_all(workers)?;
        let elapsed = started.elapsed();

        let cancelled = self.cancel.is_cancelled() && tally.traced < self.config.events;
        if cancelled {
            tracing::warn!(
                traced = tally.traced,
                requested = self.config.events,
                "run stopped early"
            );
        }
        if tally.degenerate > 0 {
            tracing::warn!(
                dropped = tally.degenerate,
                "events dropped after becoming non-finite"
            );
        }

        let outputs = self.pipeline.save_all()?;
        let written = match &self.config.output_dir {
            Some(dir) => write_outputs(dir, &outputs)?,
            None => Vec::new(),
        };
        Ok(RunSummary {
            requested: self.config.events,
            traced: tally.traced,
            completed: tally.completed,
            absorbed: tally.absorbed,
            degenerate: tally.degenerate,
            interactions: tally.interactions,
            cancelled,
            workers,
            elapsed,
            nodes: self.pipeline.stats(),
            outputs,
            written,
        })
    }

    fn trace_all(&self, workers: usize) -> Result<WorkerTally, RunError> {
        let streams = EventStreams::new(RunSeed(self.config.seed));
        let deadline = self.config.time_budget.map(|b| Instant::now() + b);
        let (tx, rx) = crossbeam_channel::bounded::<Range<u64>>(workers * 4);
        let pipeline = &self.pipeline;
        let cancel = &self.cancel;
        let streams = &streams;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for worker in 0..workers {
                let rx = rx.clone();
                let handle = thread::Builder::new()
                    .name(format!("beamline-worker-{worker}"))
                    .spawn_scoped(scope, move || {
                        worker_loop(pipeline, streams, &rx, cancel, deadline)
                    })
                    .map_err(|e| RunError::ThreadSpawnFailed {
                        reason: e.to_string(),
                    });
                match handle {
                    Ok(h) => handles.push(h),
                    Err(e) => {
                        // Stop the workers already running, then report.
                        cancel.cancel();
                        drop(tx);
                        for h in handles {
                            let _ = h.join();
                        }
                        return Err(e);
                    }
                }
            }
            drop(rx);

            let chunk = self.config.chunk_size;
            let mut start = 0;
            while start < self.config.events && !cancel.is_cancelled() {
                let end = start.saturating_add(chunk).min(self.config.events);
                if tx.send(start..end).is_err() {
                    // Every worker is gone; the join below reports why.
                    break;
                }
                start = end;
            }
            drop(tx);

            let mut total = WorkerTally::default();
            let mut first_error = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(Ok(tally)) => total.merge(&tally),
                    Ok(Err(e)) => {
                        cancel.cancel();
                        first_error.get_or_insert(RunError::Lifecycle(e));
                    }
                    Err(_) => {
                        tracing::error!(worker, "worker panicked");
                        cancel.cancel();
                        first_error.get_or_insert(RunError::WorkerPanicked { worker });
                    }
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(total),
            }
        })
    }
}

fn worker_loop(
    pipeline: &Pipeline,
    streams: &EventStreams,
    chunks: &Receiver<Range<u64>>,
    cancel: &CancelToken,
    deadline: Option<Instant>,
) -> Result<WorkerTally, LifecycleError> {
    let mut tally = WorkerTally::default();
    for chunk in chunks.iter() {
        for index in chunk {
            if cancel.is_cancelled() {
                return Ok(tally);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                cancel.cancel();
                return Ok(tally);
            }
            let mut rng = streams.for_event(index);
            let mut event = Event::blank(ParticleKind::Photon);
            let report = pipeline.trace_event(&mut event, &mut rng)?;
            tally.traced += 1;
            tally.interactions += u64::from(report.interactions);
            match report.outcome {
                PassOutcome::Completed => tally.completed += 1,
                PassOutcome::Absorbed { .. } => tally.absorbed += 1,
                PassOutcome::Degenerate { .. } => tally.degenerate += 1,
            }
        }
    }
    Ok(tally)
}
