//! The [`TraceStatus`] directive returned by every component trace.

use std::fmt;

/// Outcome of one component's trace over one event.
///
/// The pipeline switches on this value; there is no other way for a
/// component to stop or revert an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceStatus {
    /// The event was not modified.
    PassThrough,
    /// The event state was changed; continue with the next component.
    Scattered,
    /// Drop the event. No later component or histogram sees it.
    Absorbed,
    /// Revert this component's own mutation, then continue.
    Restored,
}

impl TraceStatus {
    /// Whether the event stops here.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Absorbed)
    }

    /// Index used by per-status counters.
    pub fn index(self) -> usize {
        match self {
            Self::PassThrough => 0,
            Self::Scattered => 1,
            Self::Absorbed => 2,
            Self::Restored => 3,
        }
    }

    /// All statuses in counter order.
    pub const ALL: [TraceStatus; 4] = [
        TraceStatus::PassThrough,
        TraceStatus::Scattered,
        TraceStatus::Absorbed,
        TraceStatus::Restored,
    ];
}

impl fmt::Display for TraceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PassThrough => "pass-through",
            Self::Scattered => "scattered",
            Self::Absorbed => "absorbed",
            Self::Restored => "restored",
        };
        f.write_str(s)
    }
}
