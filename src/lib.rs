//! # sigvisor
//!
//! **Sigvisor** is a signal-driven graceful-shutdown coordinator for tokio
//! applications.
//!
//! It intercepts termination signals, starts the application's shutdown
//! routine, and escalates to a forced exit when the routine does not finish
//! in time or when the operator insists by repeating the signal.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐      ┌───────────────────────────┐
//!   │ SignalSource │─────►│       SignalWatcher       │  (owned, cancellable,
//!   │ Os / Channel │      │ bounded queue, cap = 2    │   per run)
//!   └──────────────┘      └─────────────┬─────────────┘
//!                                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ShutdownCoordinator::handle_shutdown(cancel, callback)           │
//! │    Idle ──1st signal──► ShuttingDown ──┬─ 2nd signal ─► exit(2)   │
//! │      │                        │        └─ timeout ────► dump,     │
//! │      └──── cancel ────────────┴──► Cancelled            exit(1)   │
//! └──────────────┬───────────────────────────────┬────────────────────┘
//!                ▼                               ▼
//!     ┌────────────────────┐          ┌────────────────────┐
//!     │  DiagnosticDumper  │          │    ExitStrategy    │
//!     │ StackDumper ─► Log │          │ ProcessExit / Rec. │
//!     └────────────────────┘          └────────────────────┘
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Coordination**  | Escalation state machine, one task per run.                  | [`ShutdownCoordinator`], [`ShutdownHandle`] |
//! | **Signals**       | Owned subscriptions to OS or in-process signals.             | [`SignalSource`], [`SignalWatcher`]         |
//! | **Diagnostics**   | Best-effort dump of threads and stacks before forced exit.   | [`DiagnosticDumper`], [`LogSink`]           |
//! | **Exit**          | Substitutable process termination.                           | [`ExitStrategy`], [`RecordingExit`]         |
//! | **Configuration** | Durations, exit codes, dump behaviour.                       | [`ShutdownConfig`]                          |
//! | **Errors**        | Typed errors for subscription and random generation.         | [`SignalError`], [`RandError`]              |
//! | **Utilities**     | Unordered diff, fs probes, secure random, text, assertions.  | [`compare`], [`fsutil`], [`SecureRandom`]   |
//!
//! ## Example
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use sigvisor::ShutdownCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = CancellationToken::new();
//!
//!     // SIGINT/SIGTERM → cancel the app; a second signal or 10s later → exit
//!     let stop = app.clone();
//!     ShutdownCoordinator::new().handle_shutdown(app.clone(), move || async move {
//!         stop.cancel();
//!     })?;
//!
//!     app.cancelled().await;
//!     // ... flush, close connections ...
//!     Ok(())
//! }
//! ```

mod config;
mod coordinator;
mod diagnostics;
mod error;
mod exit;
mod random;
mod signals;

pub mod compare;
pub mod fsutil;
pub mod testutil;
pub mod text;

// ---- Public re-exports ----

pub use config::ShutdownConfig;
pub use coordinator::{CoordinatorBuilder, CoordinatorState, ShutdownCoordinator, ShutdownHandle};
pub use diagnostics::{DiagnosticDumper, LogSink, StackDumper, dump_best_effort};
pub use error::{RandError, SignalError};
pub use exit::{ExitStrategy, ProcessExit, RecordingExit};
pub use random::SecureRandom;
pub use signals::{
    ChannelSignals, OsSignals, SignalKind, SignalSet, SignalSource, SignalWatcher, WATCHER_CAPACITY,
};
