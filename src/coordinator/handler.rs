//! # ShutdownCoordinator: waits for a termination signal, then escalates.
//!
//! The coordinator is created once and may start any number of independent
//! runs; each [`handle_shutdown`](ShutdownCoordinator::handle_shutdown) call
//! subscribes afresh and is scoped to its own cancellation token.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use sigvisor::{ChannelSignals, CoordinatorState, RecordingExit, ShutdownCoordinator};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let signals = Arc::new(ChannelSignals::new());
//!     let exit = Arc::new(RecordingExit::new());
//!     let coordinator = ShutdownCoordinator::builder()
//!         .with_source(signals.clone())
//!         .with_exit(exit.clone())
//!         .build();
//!
//!     let app = CancellationToken::new();
//!     let stop = app.clone();
//!     let handle = coordinator.handle_shutdown(app.clone(), move || async move {
//!         stop.cancel();
//!     })?;
//!
//!     // the application finished on its own
//!     app.cancel();
//!     assert_eq!(handle.wait().await, CoordinatorState::Cancelled);
//!     assert!(exit.codes().is_empty());
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span};

use crate::{
    config::ShutdownConfig,
    coordinator::{CoordinatorBuilder, CoordinatorState, ShutdownHandle, run::Run},
    diagnostics::DiagnosticDumper,
    error::SignalError,
    exit::ExitStrategy,
    signals::{SignalSet, SignalSource},
};

/// Signal-driven graceful-shutdown coordinator.
///
/// ### Escalation
/// 1. First signal: the shutdown callback is started (not awaited).
/// 2. Then whichever comes first wins:
///    - cancellation → nothing more happens;
///    - a second signal → exit with [`ShutdownConfig::second_signal_exit_code`];
///    - [`ShutdownConfig::max_shutdown_duration`] elapses → diagnostic dump,
///      then exit with [`ShutdownConfig::timeout_exit_code`].
pub struct ShutdownCoordinator {
    cfg: ShutdownConfig,
    signals: SignalSet,
    source: Arc<dyn SignalSource>,
    exit: Arc<dyn ExitStrategy>,
    dumper: Arc<dyn DiagnosticDumper>,
}

impl ShutdownCoordinator {
    /// Coordinator with default settings: SIGINT/SIGTERM, 10s, real process exit.
    pub fn new() -> Self {
        CoordinatorBuilder::new().build()
    }

    /// Returns a builder to customise configuration and collaborators.
    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::new()
    }

    pub(crate) fn new_internal(
        cfg: ShutdownConfig,
        signals: SignalSet,
        source: Arc<dyn SignalSource>,
        exit: Arc<dyn ExitStrategy>,
        dumper: Arc<dyn DiagnosticDumper>,
    ) -> Self {
        Self {
            cfg,
            signals,
            source,
            exit,
            dumper,
        }
    }

    /// Escalation configuration.
    pub fn config(&self) -> &ShutdownConfig {
        &self.cfg
    }

    /// Signal kinds this coordinator reacts to.
    pub fn signals(&self) -> &SignalSet {
        &self.signals
    }

    /// Arms the coordinator and returns immediately.
    ///
    /// The subscription is made before returning, so a signal raised right
    /// after this call is observed. The escalation runs on a spawned task;
    /// `shutdown` is invoked on the first signal and never awaited by the
    /// coordinator. Cancelling `cancel` ends the run silently.
    ///
    /// The subscription lasts until the run reaches `Cancelled` or
    /// `Terminated`. With [`OsSignals`](crate::OsSignals) on Unix, the watched
    /// signals then get their default action back: a later Ctrl-C during the
    /// application's final cleanup terminates the process instead of being
    /// ignored.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// ### Errors
    /// Returns [`SignalError`] if the signal source cannot subscribe.
    pub fn handle_shutdown<F, Fut>(
        &self,
        cancel: CancellationToken,
        shutdown: F,
    ) -> Result<ShutdownHandle, SignalError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let watcher = self.source.watch(&self.signals, &cancel)?;
        let (state_tx, state_rx) = watch::channel(CoordinatorState::Idle);

        let run = Run {
            cfg: self.cfg.clone(),
            exit: Arc::clone(&self.exit),
            dumper: Arc::clone(&self.dumper),
            watcher,
            cancel,
            state: state_tx,
        };

        let span = info_span!("shutdown", handler = %self.cfg.name);
        debug!(parent: &span, signals = %self.signals, "armed");
        let task = tokio::spawn(run.drive(shutdown).instrument(span));
        Ok(ShutdownHandle::new(state_rx, task))
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShutdownCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownCoordinator")
            .field("cfg", &self.cfg)
            .field("signals", &self.signals)
            .finish_non_exhaustive()
    }
}
