//! Contexts handed to components in each phase.

use std::path::{Path, PathBuf};

use beamline_hist::HistogramSnapshot;
use beamline_random::EventRng;
use beamline_table::Table;

use crate::error::ComponentError;

// ── Initialize ─────────────────────────────────────────────────────

/// Run-wide settings visible at initialization.
#[derive(Clone, Debug)]
pub struct InitOptions {
    /// Directory relative table paths are resolved against.
    pub data_dir: PathBuf,
    /// Number of events the run intends to trace.
    pub planned_events: u64,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            planned_events: 0,
        }
    }
}

/// Context passed to [`Component::initialize`](crate::Component::initialize).
#[derive(Debug)]
pub struct InitContext<'a> {
    instance: &'a str,
    index: usize,
    options: &'a InitOptions,
}

impl<'a> InitContext<'a> {
    /// Construct a context. Normally done by the pipeline.
    pub fn new(instance: &'a str, index: usize, options: &'a InitOptions) -> Self {
        Self {
            instance,
            index,
            options,
        }
    }

    /// Instance name of the node being initialized.
    pub fn instance(&self) -> &str {
        self.instance
    }

    /// Position of the node in the pipeline.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of events the run intends to trace.
    pub fn planned_events(&self) -> u64 {
        self.options.planned_events
    }

    /// Resolve `path` against the data directory unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.options.data_dir.join(path)
        }
    }

    /// Load a table, resolving its path against the data directory.
    pub fn load_table(&self, path: &Path) -> Result<Table, ComponentError> {
        let resolved = self.resolve(path);
        Table::load(&resolved).map_err(|source| ComponentError::Table {
            path: resolved,
            source,
        })
    }
}

// ── Trace ──────────────────────────────────────────────────────────

/// Per-event context passed to [`Component::trace`](crate::Component::trace).
#[derive(Debug)]
pub struct TraceContext<'a> {
    rng: &'a mut EventRng,
    interactions: u32,
}

impl<'a> TraceContext<'a> {
    /// Wrap the event's random stream.
    pub fn new(rng: &'a mut EventRng) -> Self {
        Self {
            rng,
            interactions: 0,
        }
    }

    /// The event's random stream.
    pub fn rng(&mut self) -> &mut EventRng {
        &mut *self.rng
    }

    /// Index of the event being traced.
    pub fn event_index(&self) -> u64 {
        self.rng.event_index()
    }

    /// Record that the current node scattered or otherwise interacted
    /// with the event.
    pub fn mark_interaction(&mut self) {
        self.interactions = self.interactions.saturating_add(1);
    }

    /// Interactions recorded so far in this pass.
    pub fn interactions(&self) -> u32 {
        self.interactions
    }
}

// ── Save ───────────────────────────────────────────────────────────

/// One detector file produced at save time.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedOutput {
    /// Instance that produced it.
    pub instance: String,
    /// File name, without directory.
    pub filename: String,
    /// Histogram contents.
    pub snapshot: HistogramSnapshot,
}

/// Context passed to [`Component::save`](crate::Component::save).
#[derive(Debug)]
pub struct SaveContext<'a> {
    instance: &'a str,
    outputs: Vec<SavedOutput>,
}

impl<'a> SaveContext<'a> {
    /// Construct a context for `instance`.
    pub fn new(instance: &'a str) -> Self {
        Self {
            instance,
            outputs: Vec::new(),
        }
    }

    /// Instance name of the node being saved.
    pub fn instance(&self) -> &str {
        self.instance
    }

    /// Queue `snapshot` to be written as `filename`.
    ///
    /// The name must be a plain file name, unique within the node.
    pub fn emit(
        &mut self,
        filename: impl Into<String>,
        snapshot: HistogramSnapshot,
    ) -> Result<(), ComponentError> {
        let filename = filename.into();
        if filename.is_empty() || filename.contains(['/', '\\']) || filename == ".." {
            return Err(ComponentError::Output {
                reason: format!("'{filename}' is not a plain file name"),
            });
        }
        if self.outputs.iter().any(|o| o.filename == filename) {
            return Err(ComponentError::Output {
                reason: format!("file '{filename}' emitted twice"),
            });
        }
        self.outputs.push(SavedOutput {
            instance: self.instance.to_string(),
            filename,
            snapshot,
        });
        Ok(())
    }

    /// Outputs queued so far.
    pub fn outputs(&self) -> &[SavedOutput] {
        &self.outputs
    }

    /// Take the queued outputs.
    pub fn into_outputs(self) -> Vec<SavedOutput> {
        self.outputs
    }
}
