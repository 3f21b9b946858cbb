//! # Termination signals as owned, cancellable event sources.
//!
//! ```text
//! SignalSet ──► SignalSource::watch(set, cancel) ──► SignalWatcher
//!                   │                                   │
//!                   ├─ OsSignals      (tokio::signal)   ├─ recv()  -> Option<SignalKind>
//!                   └─ ChannelSignals (in-process)      └─ stop() / drop / cancel
//! ```
//!
//! - [`SignalKind`] / [`SignalSet`] name the signals of interest.
//! - [`SignalSource`] is the seam: the coordinator never installs handlers itself.
//! - [`SignalWatcher`] owns the subscription; dropping it releases it and,
//!   for OS signals, gives the default action back once nobody watches.
//!
//! Each `watch` call creates an independent subscription, so several
//! coordinators (or tests) can observe signals without interfering.

mod kind;
#[cfg(unix)]
mod restore;
mod source;
mod watcher;

pub use kind::{SignalKind, SignalSet};
pub use source::{ChannelSignals, OsSignals, SignalSource};
pub use watcher::{SignalWatcher, WATCHER_CAPACITY};
