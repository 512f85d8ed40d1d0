//! Error types for components and the pipeline.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use beamline_hist::HistogramError;
use beamline_table::TableError;

use crate::lifecycle::LifecycleState;

// ── Component errors ───────────────────────────────────────────────

/// Failure reported by a component during initialization or save.
#[derive(Debug)]
pub enum ComponentError {
    /// A parameter is missing, out of range or inconsistent.
    InvalidConfig {
        /// What is wrong.
        reason: String,
    },
    /// A data table could not be loaded or lacks required columns.
    Table {
        /// Path of the table.
        path: PathBuf,
        /// Underlying table error.
        source: TableError,
    },
    /// A detector histogram could not be created.
    Histogram(HistogramError),
    /// Output could not be produced.
    Output {
        /// What is wrong.
        reason: String,
    },
}

impl ComponentError {
    /// Shorthand for [`ComponentError::InvalidConfig`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid configuration: {reason}"),
            Self::Table { path, source } => {
                write!(f, "table '{}': {source}", path.display())
            }
            Self::Histogram(e) => write!(f, "histogram: {e}"),
            Self::Output { reason } => write!(f, "output: {reason}"),
        }
    }
}

impl Error for ComponentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Table { source, .. } => Some(source),
            Self::Histogram(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HistogramError> for ComponentError {
    fn from(e: HistogramError) -> Self {
        Self::Histogram(e)
    }
}

// ── Lifecycle errors ───────────────────────────────────────────────

/// A lifecycle phase was requested out of order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifecycleError {
    /// Instance name of the node.
    pub instance: String,
    /// The phase that was requested.
    pub operation: &'static str,
    /// The state the node was in.
    pub state: LifecycleState,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot {} node '{}' in state {}",
            self.operation, self.instance, self.state
        )
    }
}

impl Error for LifecycleError {}

// ── Pipeline errors ────────────────────────────────────────────────

/// Errors from pipeline construction and phase driving.
#[derive(Debug)]
pub enum PipelineError {
    /// No nodes were given.
    EmptyPipeline,
    /// A node has an empty instance name.
    EmptyName {
        /// Position of the node.
        index: usize,
    },
    /// Two nodes share an instance name.
    DuplicateName {
        /// The repeated name.
        name: String,
        /// Position of the first node with that name.
        first: usize,
        /// Position of the second node with that name.
        second: usize,
    },
    /// A node failed to initialize. Fatal for the run.
    Initialize {
        /// Instance name.
        instance: String,
        /// Position in the pipeline.
        index: usize,
        /// The component's error.
        source: ComponentError,
    },
    /// A node failed to save its output.
    Save {
        /// Instance name.
        instance: String,
        /// Position in the pipeline.
        index: usize,
        /// The component's error.
        source: ComponentError,
    },
    /// Two nodes saved outputs under the same file name.
    DuplicateOutput {
        /// The shared file name.
        filename: String,
        /// Instance that emitted it first.
        first: String,
        /// Instance that emitted it again.
        second: String,
    },
    /// A phase was driven out of order.
    Lifecycle(LifecycleError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPipeline => write!(f, "pipeline has no components"),
            Self::EmptyName { index } => write!(f, "component at position {index} has no name"),
            Self::DuplicateName {
                name,
                first,
                second,
            } => write!(
                f,
                "instance name '{name}' used at positions {first} and {second}"
            ),
            Self::Initialize {
                instance,
                index,
                source,
            } => write!(
                f,
                "component '{instance}' (position {index}) failed to initialize: {source}"
            ),
            Self::Save {
                instance,
                index,
                source,
            } => write!(
                f,
                "component '{instance}' (position {index}) failed to save: {source}"
            ),
            Self::DuplicateOutput {
                filename,
                first,
                second,
            } => write!(
                f,
                "output file '{filename}' emitted by both '{first}' and '{second}'"
            ),
            Self::Lifecycle(e) => write!(f, "{e}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Initialize { source, .. } | Self::Save { source, .. } => Some(source),
            Self::Lifecycle(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LifecycleError> for PipelineError {
    fn from(e: LifecycleError) -> Self {
        Self::Lifecycle(e)
    }
}
