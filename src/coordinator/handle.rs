//! # ShutdownHandle: observing one escalation run.

use tokio::{sync::watch, task::JoinHandle};

use crate::coordinator::CoordinatorState;

/// Handle to a run started by [`ShutdownCoordinator::handle_shutdown`](crate::ShutdownCoordinator::handle_shutdown).
///
/// Dropping the handle does **not** stop the run; cancel the token passed to
/// `handle_shutdown` for that.
#[derive(Debug)]
pub struct ShutdownHandle {
    state: watch::Receiver<CoordinatorState>,
    task: JoinHandle<CoordinatorState>,
}

impl ShutdownHandle {
    pub(crate) fn new(
        state: watch::Receiver<CoordinatorState>,
        task: JoinHandle<CoordinatorState>,
    ) -> Self {
        Self { state, task }
    }

    /// Current state of the run.
    pub fn state(&self) -> CoordinatorState {
        *self.state.borrow()
    }

    /// Returns a receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.clone()
    }

    /// Waits until the run reaches `target` (or any terminal state) and returns the state reached.
    pub async fn wait_for(&self, target: CoordinatorState) -> CoordinatorState {
        let mut rx = self.state.clone();
        if let Ok(s) = rx.wait_for(|s| *s == target || s.is_terminal()).await {
            return *s;
        }
        *rx.borrow()
    }

    /// Returns `true` once the run task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the run to end and returns its final state.
    ///
    /// If the run task was aborted, returns the last state it published.
    pub async fn wait(self) -> CoordinatorState {
        match self.task.await {
            Ok(state) => state,
            Err(_) => *self.state.borrow(),
        }
    }

    /// Aborts the run task. Its subscriptions and timer are released.
    pub fn abort(&self) {
        self.task.abort();
    }
}
