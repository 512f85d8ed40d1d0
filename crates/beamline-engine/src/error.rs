//! Run-level errors.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use beamline_node::{LifecycleError, PipelineError};

use crate::config::ConfigError;

/// Errors that abort a run.
#[derive(Debug)]
pub enum RunError {
    /// The run configuration is invalid.
    Config(ConfigError),
    /// Pipeline construction or a lifecycle phase failed. Initialization
    /// failures name the offending instance.
    Pipeline(PipelineError),
    /// A worker found the pipeline in the wrong phase.
    Lifecycle(LifecycleError),
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the failure.
        reason: String,
    },
    /// A worker thread panicked.
    WorkerPanicked {
        /// Worker number.
        worker: usize,
    },
    /// A detector file could not be written.
    Output {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Pipeline(e) => write!(f, "pipeline: {e}"),
            Self::Lifecycle(e) => write!(f, "lifecycle: {e}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
            Self::WorkerPanicked { worker } => write!(f, "worker {worker} panicked"),
            Self::Output { path, source } => {
                write!(f, "cannot write '{}': {source}", path.display())
            }
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Pipeline(e) => Some(e),
            Self::Lifecycle(e) => Some(e),
            Self::Output { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PipelineError> for RunError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

impl From<LifecycleError> for RunError {
    fn from(e: LifecycleError) -> Self {
        Self::Lifecycle(e)
    }
}
