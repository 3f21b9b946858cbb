//! # Shutdown coordination: signal-driven escalation.
//!
//! ```text
//! handle_shutdown(cancel, callback)
//!   ├─► source.watch(signals, cancel)        (subscribe now, fail early)
//!   └─► tokio::spawn(run)                    (returns ShutdownHandle at once)
//!
//! run:
//!   Idle ──┬─ cancel ───────────────────────────────────────► Cancelled
//!          └─ 1st signal ─► warn, spawn callback ─► ShuttingDown
//!                                                    │
//!   ShuttingDown ──┬─ cancel ─────────────────────────► Cancelled
//!                  ├─ 2nd signal ─► warn, [dump] ─► exit(2) ─► Terminated
//!                  └─ timeout ────► error, dump ──► exit(1) ─► Terminated
//! ```
//!
//! Internal modules:
//! - [`handler`]: the coordinator and its public entry point;
//! - [`builder`]: wiring of configuration and collaborators;
//! - [`run`]: one escalation run (the state machine task);
//! - [`state`]: states and the allowed transitions;
//! - [`handle`]: observing a run from the outside.

mod builder;
mod handle;
mod handler;
mod run;
mod state;

pub use builder::CoordinatorBuilder;
pub use handle::ShutdownHandle;
pub use handler::ShutdownCoordinator;
pub use state::CoordinatorState;
