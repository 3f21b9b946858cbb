//! # Signal sources: where a [`SignalWatcher`] gets its signals from.
//!
//! - [`OsSignals`] listens to real process signals through [`tokio::signal`].
//! - [`ChannelSignals`] is an in-process broadcaster; [`ChannelSignals::send`]
//!   plays the role of the operator. Useful for tests and for embedding the
//!   coordinator where signals arrive by other means.
//!
//! ## Unix
//! Every [`SignalKind`] maps to its native signal. While at least one
//! [`OsSignals`] watcher for a kind is alive, the kind is caught and delivered
//! to watchers; once the last one is stopped or dropped, the kind's default
//! action (usually process termination) applies again.
//!
//! ## Windows
//! Only [`SignalKind::Interrupt`] is supported, through [`tokio::signal::ctrl_c`].

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    error::SignalError,
    signals::{SignalKind, SignalSet, SignalWatcher},
};

/// Something that can hand out signal subscriptions.
///
/// Implementations must subscribe **before** returning, so that a signal raised
/// right after `watch` returns is not lost, and must stop delivering once
/// `cancel` fires.
pub trait SignalSource: Send + Sync + 'static {
    /// Subscribes to `set`, scoped to `cancel`.
    fn watch(
        &self,
        set: &SignalSet,
        cancel: &CancellationToken,
    ) -> Result<SignalWatcher, SignalError>;
}

/// Real OS signals.
///
/// Must be used from within a tokio runtime.
///
/// On Unix, watching a kind replaces its default action only for as long as a
/// watcher exists. After a coordinator run ends (`Cancelled` or `Terminated`)
/// its watcher is gone, so a further Ctrl-C or `SIGTERM` terminates the
/// process the usual way instead of being swallowed. On other platforms the
/// Ctrl-C handler stays installed once registered.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSignals;

impl OsSignals {
    /// Creates the OS-backed source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl SignalSource for OsSignals {
    fn watch(
        &self,
        set: &SignalSet,
        cancel: &CancellationToken,
    ) -> Result<SignalWatcher, SignalError> {
        use tokio::signal::unix::signal;

        use crate::signals::restore::Interest;

        SignalWatcher::with_pumps(cancel, |pumps| {
            for kind in set.iter() {
                let interest = Interest::acquire(kind)
                    .map_err(|source| SignalError::Register { kind, source })?;
                pumps.hold(interest);

                let mut stream = signal(kind.to_unix())
                    .map_err(|source| SignalError::Register { kind, source })?;

                pumps.spawn(move |tx, token| async move {
                    loop {
                        tokio::select! {
                            _ = token.cancelled() => break,
                            got = stream.recv() => match got {
                                Some(()) => tx.deliver(kind),
                                None => break,
                            },
                        }
                    }
                });
            }
            Ok(())
        })
    }
}

#[cfg(not(unix))]
impl SignalSource for OsSignals {
    fn watch(
        &self,
        set: &SignalSet,
        cancel: &CancellationToken,
    ) -> Result<SignalWatcher, SignalError> {
        if let Some(kind) = set.iter().find(|k| *k != SignalKind::Interrupt) {
            return Err(SignalError::Unsupported { kind });
        }
        SignalWatcher::with_pumps(cancel, |pumps| {
            if set.contains(SignalKind::Interrupt) {
                pumps.spawn(|tx, token| async move {
                    loop {
                        tokio::select! {
                            _ = token.cancelled() => break,
                            res = tokio::signal::ctrl_c() => match res {
                                Ok(()) => tx.deliver(SignalKind::Interrupt),
                                Err(e) => {
                                    debug!(error = %e, "ctrl-c listener failed");
                                    break;
                                }
                            },
                        }
                    }
                });
            }
            Ok::<(), SignalError>(())
        })
    }
}

/// In-process signal broadcaster.
///
/// Every watcher created from the same `ChannelSignals` (or a clone of it)
/// observes each [`send`](Self::send), filtered by its own [`SignalSet`].
///
/// # Example
/// ```
/// use sigvisor::{ChannelSignals, SignalKind, SignalSet, SignalSource};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let signals = ChannelSignals::new();
/// let cancel = CancellationToken::new();
/// let mut watcher = signals.watch(&SignalSet::default(), &cancel).unwrap();
///
/// signals.send(SignalKind::Terminate);
/// assert_eq!(watcher.recv().await, Some(SignalKind::Terminate));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSignals {
    tx: broadcast::Sender<SignalKind>,
}

impl ChannelSignals {
    /// Creates a broadcaster with no watchers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(16);
        Self { tx }
    }

    /// Delivers `kind` to every live watcher; returns how many were reached.
    pub fn send(&self, kind: SignalKind) -> usize {
        self.tx.send(kind).unwrap_or(0)
    }

    /// Number of live subscriptions.
    pub fn watchers(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChannelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for ChannelSignals {
    fn watch(
        &self,
        set: &SignalSet,
        cancel: &CancellationToken,
    ) -> Result<SignalWatcher, SignalError> {
        let mut rx = self.tx.subscribe();
        let set = set.clone();

        SignalWatcher::with_pumps(cancel, move |pumps| {
            pumps.spawn(move |tx, token| async move {
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        got = rx.recv() => match got {
                            Ok(kind) if set.contains(kind) => tx.deliver(kind),
                            Ok(_) => {}
                            Err(broadcast::error::RecvError::Lagged(n)) => {
                                debug!(skipped = n, "signal broadcaster lagged");
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        },
                    }
                }
            });
            Ok(())
        })
    }
}
