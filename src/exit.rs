//! # Process termination as a substitutable strategy.
//!
//! - [`ProcessExit`] ends the process for real ([`std::process::exit`]).
//! - [`RecordingExit`] only remembers the requested codes, so escalation can
//!   be asserted in tests.
//! - Any `Fn(i32) + Send + Sync` closure is an exit strategy as well.

use std::sync::{Mutex, PoisonError};

use tokio::sync::Notify;

/// Terminates the process with an exit code.
pub trait ExitStrategy: Send + Sync + 'static {
    /// Requests termination with `code`.
    ///
    /// The default strategy never returns; substitutes may.
    fn exit(&self, code: i32);
}

impl<F> ExitStrategy for F
where
    F: Fn(i32) + Send + Sync + 'static,
{
    fn exit(&self, code: i32) {
        self(code)
    }
}

/// Unrecoverable process exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl ExitStrategy for ProcessExit {
    fn exit(&self, code: i32) {
        std::process::exit(code)
    }
}

/// Records requested exit codes instead of terminating.
///
/// # Example
/// ```
/// use sigvisor::{ExitStrategy, RecordingExit};
///
/// let exit = RecordingExit::new();
/// exit.exit(2);
/// assert_eq!(exit.codes(), vec![2]);
/// assert_eq!(exit.last(), Some(2));
/// ```
#[derive(Debug, Default)]
pub struct RecordingExit {
    codes: Mutex<Vec<i32>>,
    notify: Notify,
}

impl RecordingExit {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All codes requested so far, oldest first.
    pub fn codes(&self) -> Vec<i32> {
        self.codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recently requested code.
    pub fn last(&self) -> Option<i32> {
        self.codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    /// Waits until at least one exit was requested and returns the latest code.
    pub async fn wait(&self) -> i32 {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(code) = self.last() {
                return code;
            }
            notified.await;
        }
    }
}

impl ExitStrategy for RecordingExit {
    fn exit(&self, code: i32) {
        self.codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(code);
        self.notify.notify_waiters();
    }
}
