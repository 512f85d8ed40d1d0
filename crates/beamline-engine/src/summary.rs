//! What a run did.

use std::path::PathBuf;
use std::time::Duration;

use beamline_node::{NodeStatsSnapshot, SavedOutput};

/// Totals of one run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Events the configuration asked for.
    pub requested: u64,
    /// Events actually traced (all of them unless cancelled).
    pub traced: u64,
    /// Events that traversed every node.
    pub completed: u64,
    /// Events absorbed by some node.
    pub absorbed: u64,
    /// Events dropped as non-finite.
    pub degenerate: u64,
    /// Interactions marked over all events.
    pub interactions: u64,
    /// Whether the run stopped early.
    pub cancelled: bool,
    /// Worker threads used.
    pub workers: usize,
    /// Wall-clock time of the tracing phase.
    pub elapsed: Duration,
    /// Per-node counters, in pipeline order.
    pub nodes: Vec<NodeStatsSnapshot>,
    /// Detector contents, in pipeline order.
    pub outputs: Vec<SavedOutput>,
    /// Files written, if an output directory was configured.
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    /// The output of `instance` named `filename`.
    pub fn output(&self, instance: &str, filename: &str) -> Option<&SavedOutput> {
        self.outputs
            .iter()
            .find(|o| o.instance == instance && o.filename == filename)
    }

    /// Every output produced by `instance`.
    pub fn outputs_of<'a>(&'a self, instance: &'a str) -> impl Iterator<Item = &'a SavedOutput> {
        self.outputs.iter().filter(move |o| o.instance == instance)
    }

    /// Counters of node `instance`.
    pub fn node(&self, instance: &str) -> Option<&NodeStatsSnapshot> {
        self.nodes.iter().find(|n| n.name == instance)
    }

    /// Traced events per second of wall-clock time.
    pub fn events_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.traced as f64 / secs
        } else {
            0.0
        }
    }
}
