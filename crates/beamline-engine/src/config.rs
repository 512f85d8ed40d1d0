//! Run configuration and validation.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// ── RunConfig ──────────────────────────────────────────────────────

/// Parameters of one simulation run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Number of events to trace. Must be at least 1.
    pub events: u64,
    /// Seed of the per-event random streams.
    pub seed: u64,
    /// Worker thread count. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 64]`).
    pub workers: Option<usize>,
    /// Events handed to a worker at a time. Must be at least 1.
    pub chunk_size: u64,
    /// Wall-clock budget. When it runs out the run stops early, exactly
    /// as if it had been cancelled.
    pub time_budget: Option<Duration>,
    /// Where detector files are written. `None` = keep them in memory
    /// only (see [`RunSummary::outputs`](crate::RunSummary::outputs)).
    pub output_dir: Option<PathBuf>,
    /// Directory relative table paths are resolved against.
    pub data_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            events: 1_000_000,
            seed: 0,
            workers: None,
            chunk_size: 4096,
            time_budget: None,
            output_dir: None,
            data_dir: PathBuf::from("."),
        }
    }
}

impl RunConfig {
    /// Default configuration tracing `events` events.
    pub fn with_events(events: u64) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// Set the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set an explicit worker count.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the chunk size.
    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the wall-clock budget.
    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Write detector files into `dir`.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Resolve relative table paths against `dir`.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Check the configuration for structural errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.events == 0 {
            return Err(ConfigError::NoEvents);
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.time_budget == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeBudget);
        }
        if let Some(dir) = &self.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::EmptyOutputDir);
            }
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 256]`, and no more workers are
    /// used than there are chunks to hand out.
    pub fn resolved_worker_count(&self) -> usize {
        let n = match self.workers {
            Some(n) => n.clamp(1, 256),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 64),
        };
        let chunks = self.events.div_ceil(self.chunk_size.max(1));
        n.min(usize::try_from(chunks).unwrap_or(usize::MAX)).max(1)
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`RunConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `events` is zero.
    NoEvents,
    /// `chunk_size` is zero.
    ZeroChunkSize,
    /// `time_budget` is zero.
    ZeroTimeBudget,
    /// `output_dir` is an empty path.
    EmptyOutputDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEvents => write!(f, "events must be at least 1"),
            Self::ZeroChunkSize => write!(f, "chunk_size must be at least 1"),
            Self::ZeroTimeBudget => write!(f, "time_budget must be non-zero"),
            Self::EmptyOutputDir => write!(f, "output_dir is empty"),
        }
    }
}

impl Error for ConfigError {}
