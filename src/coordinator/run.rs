//! # One escalation run.
//!
//! Owns everything a run needs (watcher, timer, state sender) so that every
//! exit path, including abort, releases the subscription and the timer.
//!
//! ## Rules
//! - Two suspension points: the first-signal wait and the escalation race.
//! - Races are `biased` towards cancellation: when cancellation and another
//!   event are ready together, cancellation wins.
//! - The run task is the only writer of the state channel.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::watch, time};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, warn};

use crate::{
    config::ShutdownConfig,
    coordinator::CoordinatorState,
    diagnostics::{DiagnosticDumper, LogSink, dump_best_effort},
    exit::ExitStrategy,
    signals::{SignalKind, SignalWatcher},
};

/// Winner of the escalation race.
enum Escalation {
    Cancelled,
    SecondSignal(SignalKind),
    TimedOut,
}

pub(crate) struct Run {
    pub(crate) cfg: ShutdownConfig,
    pub(crate) exit: Arc<dyn ExitStrategy>,
    pub(crate) dumper: Arc<dyn DiagnosticDumper>,
    pub(crate) watcher: SignalWatcher,
    pub(crate) cancel: CancellationToken,
    pub(crate) state: watch::Sender<CoordinatorState>,
}

impl Run {
    /// Drives the state machine to a terminal state.
    pub(crate) async fn drive<F, Fut>(mut self, shutdown: F) -> CoordinatorState
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let first = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            kind = next_signal(&mut self.watcher) => Some(kind),
        };
        let Some(kind) = first else {
            return self.finish(CoordinatorState::Cancelled);
        };

        warn!(signal = %kind, "received signal, shutting down");
        self.transition(CoordinatorState::ShuttingDown);
        spawn_callback(shutdown);

        let max = self.cfg.max_shutdown_duration;
        let escalation = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Escalation::Cancelled,
            kind = next_signal(&mut self.watcher) => Escalation::SecondSignal(kind),
            _ = time::sleep(max) => Escalation::TimedOut,
        };
        self.watcher.stop();

        match escalation {
            Escalation::Cancelled => self.finish(CoordinatorState::Cancelled),
            Escalation::SecondSignal(kind) => {
                warn!(signal = %kind, "received signal (second attempt), terminating");
                if self.cfg.dump_on_second_signal {
                    self.dump();
                }
                self.exit.exit(self.cfg.second_signal_exit_code);
                self.finish(CoordinatorState::Terminated)
            }
            Escalation::TimedOut => {
                error!(
                    max_shutdown_duration = ?max,
                    "application did not shut down in time, terminating"
                );
                self.dump();
                self.exit.exit(self.cfg.timeout_exit_code);
                self.finish(CoordinatorState::Terminated)
            }
        }
    }

    fn dump(&self) {
        dump_best_effort(self.dumper.as_ref(), LogSink::new(self.cfg.dump_level));
    }

    fn transition(&self, next: CoordinatorState) {
        let prev = *self.state.borrow();
        debug_assert!(
            prev.can_transition_to(next),
            "invalid transition {prev} -> {next}"
        );
        self.state.send_replace(next);
        debug!(from = %prev, to = %next, "state transition");
    }

    fn finish(self, terminal: CoordinatorState) -> CoordinatorState {
        self.transition(terminal);
        terminal
    }
}

/// Next signal from the watcher; never resolves once the watcher is closed.
async fn next_signal(watcher: &mut SignalWatcher) -> SignalKind {
    match watcher.recv().await {
        Some(kind) => kind,
        None => std::future::pending().await,
    }
}

/// Starts the shutdown callback without waiting for it.
///
/// A panic inside the callback is caught and logged.
fn spawn_callback<F, Fut>(shutdown: F)
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let guarded = AssertUnwindSafe(async move { shutdown().await }).catch_unwind();
    tokio::spawn(
        async move {
            if let Err(panic) = guarded.await {
                error!(panic = %panic_message(&*panic), "shutdown callback panicked");
            }
        }
        .in_current_span(),
    );
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
