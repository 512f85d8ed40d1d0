//! Per-node event counters.

use std::sync::atomic::{AtomicU64, Ordering};

use beamline_core::TraceStatus;

/// Atomic counters for one node, updated from every worker.
#[derive(Debug, Default)]
pub struct NodeStats {
    entered: AtomicU64,
    by_status: [AtomicU64; 4],
    degenerate: AtomicU64,
    interactions: AtomicU64,
}

impl NodeStats {
    pub(crate) fn record_entry(&self) {
        self.entered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_status(&self, status: TraceStatus) {
        self.by_status[status.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_degenerate(&self) {
        self.degenerate.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_interactions(&self, n: u32) {
        if n > 0 {
            self.interactions.fetch_add(u64::from(n), Ordering::Relaxed);
        }
    }

    /// Copy the counters.
    pub fn snapshot(&self, name: &str) -> NodeStatsSnapshot {
        let status = |s: TraceStatus| self.by_status[s.index()].load(Ordering::Relaxed);
        NodeStatsSnapshot {
            name: name.to_string(),
            entered: self.entered.load(Ordering::Relaxed),
            pass_through: status(TraceStatus::PassThrough),
            scattered: status(TraceStatus::Scattered),
            absorbed: status(TraceStatus::Absorbed),
            restored: status(TraceStatus::Restored),
            degenerate: self.degenerate.load(Ordering::Relaxed),
            interactions: self.interactions.load(Ordering::Relaxed),
        }
    }
}

/// Counters of one node at a point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStatsSnapshot {
    /// Instance name.
    pub name: String,
    /// Events that reached the node.
    pub entered: u64,
    /// Events that passed through unchanged in intent.
    pub pass_through: u64,
    /// Events the node scattered.
    pub scattered: u64,
    /// Events the node absorbed.
    pub absorbed: u64,
    /// Events the node restored.
    pub restored: u64,
    /// Events dropped after the node left them non-finite.
    pub degenerate: u64,
    /// Interactions marked by the node.
    pub interactions: u64,
}

impl NodeStatsSnapshot {
    /// Events that left the node and continued downstream.
    pub fn continued(&self) -> u64 {
        self.pass_through + self.scattered + self.restored
    }
}
