//! Per-node lifecycle state machine.

use std::fmt;

use crate::error::LifecycleError;

/// Phase a node is in.
///
/// ```text
/// Uninitialized ─initialize─▶ Initialized ─activate─▶ Active
///        │                         │                    │
///        │                         └──────save──────────┴─▶ Finalizing
///        └──────────────── teardown (from any) ─────────────▶ TornDown
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, not yet initialized.
    Uninitialized,
    /// Initialize succeeded.
    Initialized,
    /// Accepting events.
    Active,
    /// Output saved; no more events.
    Finalizing,
    /// Resources released. Terminal.
    TornDown,
}

impl LifecycleState {
    pub(crate) fn initialize(self, instance: &str) -> Result<Self, LifecycleError> {
        match self {
            Self::Uninitialized => Ok(Self::Initialized),
            other => Err(other.reject(instance, "initialize")),
        }
    }

    pub(crate) fn activate(self, instance: &str) -> Result<Self, LifecycleError> {
        match self {
            Self::Initialized => Ok(Self::Active),
            other => Err(other.reject(instance, "activate")),
        }
    }

    pub(crate) fn save(self, instance: &str) -> Result<Self, LifecycleError> {
        match self {
            Self::Initialized | Self::Active => Ok(Self::Finalizing),
            other => Err(other.reject(instance, "save")),
        }
    }

    pub(crate) fn teardown(self, instance: &str) -> Result<Self, LifecycleError> {
        match self {
            Self::TornDown => Err(self.reject(instance, "tear down")),
            _ => Ok(Self::TornDown),
        }
    }

    /// Whether the component's `initialize` ran successfully at some point,
    /// so `teardown` must be called on it.
    pub fn holds_resources(self) -> bool {
        matches!(self, Self::Initialized | Self::Active | Self::Finalizing)
    }

    fn reject(self, instance: &str, operation: &'static str) -> LifecycleError {
        LifecycleError {
            instance: instance.to_string(),
            operation,
            state: self,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Active => "active",
            Self::Finalizing => "finalizing",
            Self::TornDown => "torn down",
        };
        f.write_str(s)
    }
}
