//! # Coordinator states.
//!
//! ```text
//! Idle ──► ShuttingDown ──► Terminated
//!   │            │
//!   └────────────┴────────► Cancelled
//! ```
//!
//! ## Rules
//! - Transitions only move forward; no state is entered twice.
//! - `Cancelled` and `Terminated` are terminal.

use std::fmt;

/// State of one coordinator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinatorState {
    /// Armed, waiting for the first signal.
    Idle,
    /// The shutdown callback was started; waiting for escalation or cancellation.
    ShuttingDown,
    /// Cancelled from outside; no further action is taken.
    Cancelled,
    /// The exit strategy was invoked.
    Terminated,
}

impl CoordinatorState {
    /// Returns `true` for `Cancelled` and `Terminated`.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, CoordinatorState::Cancelled | CoordinatorState::Terminated)
    }

    /// Reports whether `next` may follow `self`.
    pub fn can_transition_to(&self, next: CoordinatorState) -> bool {
        use CoordinatorState::*;

        matches!(
            (self, next),
            (Idle, ShuttingDown)
                | (Idle, Cancelled)
                | (ShuttingDown, Cancelled)
                | (ShuttingDown, Terminated)
        )
    }

    /// Short snake_case label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            CoordinatorState::Idle => "idle",
            CoordinatorState::ShuttingDown => "shutting_down",
            CoordinatorState::Cancelled => "cancelled",
            CoordinatorState::Terminated => "terminated",
        }
    }
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
