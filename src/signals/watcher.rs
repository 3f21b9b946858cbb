//! # SignalWatcher: an owned subscription to a set of signal kinds.
//!
//! ```text
//! pump (one per kind) ── try_send(kind) ──► [bounded queue, cap = 2] ──► recv()
//!        │                                        (excess dropped)
//!        └── exits on: watcher token cancelled | source closed | watcher dropped
//! ```
//!
//! ## Rules
//! - At most [`WATCHER_CAPACITY`] signals wait in the queue; later ones are dropped.
//!   Only the first two occurrences matter to the coordinator.
//! - The watcher token is a **child** of the caller's cancellation token:
//!   cancelling the caller stops the watcher, stopping the watcher never
//!   cancels the caller.
//! - Dropping the watcher aborts its pumps, which releases the underlying
//!   subscriptions.
//! - Guards handed to [`Pumps::hold`] live exactly as long as the subscription:
//!   they are released by [`SignalWatcher::stop`] or by drop, not by parent
//!   cancellation alone.

use std::future::Future;

use tokio::{sync::mpsc, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::signals::SignalKind;

/// Number of received signals a watcher buffers before dropping new ones.
pub const WATCHER_CAPACITY: usize = 2;

/// Receiving side of a signal subscription.
///
/// Created by a [`SignalSource`](crate::SignalSource).
pub struct SignalWatcher {
    rx: mpsc::Receiver<SignalKind>,
    token: CancellationToken,
    pumps: JoinSet<()>,
    held: Vec<Box<dyn Send + Sync>>,
}

impl SignalWatcher {
    /// Builds a watcher whose pumps are started by `install`.
    ///
    /// If `install` fails, pumps it already started are aborted.
    pub(crate) fn with_pumps<E, F>(parent: &CancellationToken, install: F) -> Result<Self, E>
    where
        F: FnOnce(&mut Pumps) -> Result<(), E>,
    {
        let (tx, rx) = mpsc::channel(WATCHER_CAPACITY);
        let token = parent.child_token();
        let mut pumps = Pumps {
            set: JoinSet::new(),
            tx: SignalTx { tx },
            token: token.clone(),
            held: Vec::new(),
        };

        if let Err(e) = install(&mut pumps) {
            token.cancel();
            return Err(e);
        }
        Ok(Self {
            rx,
            token,
            pumps: pumps.set,
            held: pumps.held,
        })
    }

    /// Waits for the next received signal.
    ///
    /// Returns `None` once the watcher is stopped (explicitly or through the
    /// parent token) or every pump has ended.
    pub async fn recv(&mut self) -> Option<SignalKind> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            kind = self.rx.recv() => kind,
        }
    }

    /// Unsubscribes: pumps stop and buffered signals are discarded.
    pub fn stop(&mut self) {
        self.token.cancel();
        self.rx.close();
        self.pumps.abort_all();
        self.held.clear();
    }

    /// Returns `true` once [`stop`](Self::stop) was called or the parent token was cancelled.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl std::fmt::Debug for SignalWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalWatcher")
            .field("pumps", &self.pumps.len())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// Pump tasks feeding one watcher.
pub(crate) struct Pumps {
    set: JoinSet<()>,
    tx: SignalTx,
    token: CancellationToken,
    held: Vec<Box<dyn Send + Sync>>,
}

impl Pumps {
    /// Spawns a pump. It receives the queue sender and the watcher token, and
    /// must return once the token is cancelled.
    pub(crate) fn spawn<F, Fut>(&mut self, pump: F)
    where
        F: FnOnce(SignalTx, CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.set.spawn(pump(self.tx.clone(), self.token.clone()));
    }

    /// Keeps `guard` alive until the watcher is stopped or dropped.
    #[cfg_attr(not(unix), allow(dead_code))]
    pub(crate) fn hold<G: Send + Sync + 'static>(&mut self, guard: G) {
        self.held.push(Box::new(guard));
    }
}

/// Sending side of the watcher queue.
#[derive(Clone)]
pub(crate) struct SignalTx {
    tx: mpsc::Sender<SignalKind>,
}

impl SignalTx {
    /// Queues `kind` without waiting; drops it if the queue is full.
    pub(crate) fn deliver(&self, kind: SignalKind) {
        match self.tx.try_send(kind) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(signal = %kind, "signal queue full, dropping");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    fn manual(parent: &CancellationToken) -> (SignalWatcher, SignalTx) {
        let mut out = None;
        let watcher = SignalWatcher::with_pumps::<(), _>(parent, |pumps| {
            out = Some(pumps.tx.clone());
            Ok(())
        })
        .unwrap();
        (watcher, out.unwrap())
    }

    #[tokio::test]
    async fn test_buffers_two_and_drops_excess() {
        let parent = CancellationToken::new();
        let (mut watcher, tx) = manual(&parent);

        tx.deliver(SignalKind::Interrupt);
        tx.deliver(SignalKind::Terminate);
        tx.deliver(SignalKind::Quit);

        assert_eq!(watcher.recv().await, Some(SignalKind::Interrupt));
        assert_eq!(watcher.recv().await, Some(SignalKind::Terminate));

        tx.deliver(SignalKind::Hangup);
        assert_eq!(watcher.recv().await, Some(SignalKind::Hangup));
    }

    #[tokio::test]
    async fn test_parent_cancel_stops_watcher() {
        let parent = CancellationToken::new();
        let (mut watcher, tx) = manual(&parent);

        tx.deliver(SignalKind::Interrupt);
        parent.cancel();

        assert!(watcher.is_stopped());
        assert_eq!(watcher.recv().await, None);
    }

    #[tokio::test]
    async fn test_stop_does_not_cancel_parent() {
        let parent = CancellationToken::new();
        let (mut watcher, _tx) = manual(&parent);

        watcher.stop();

        assert!(watcher.is_stopped());
        assert!(!parent.is_cancelled());
        assert_eq!(watcher.recv().await, None);
    }

    struct Flag(Arc<AtomicBool>);

    impl Drop for Flag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    fn holding(parent: &CancellationToken) -> (SignalWatcher, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        let flag = Flag(Arc::clone(&released));
        let watcher = SignalWatcher::with_pumps::<(), _>(parent, move |pumps| {
            pumps.hold(flag);
            Ok(())
        })
        .unwrap();
        (watcher, released)
    }

    #[tokio::test]
    async fn test_held_guard_released_on_stop() {
        let parent = CancellationToken::new();
        let (mut watcher, released) = holding(&parent);

        parent.cancel();
        assert!(!released.load(Ordering::SeqCst));

        watcher.stop();
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_held_guard_released_on_drop() {
        let parent = CancellationToken::new();
        let (watcher, released) = holding(&parent);

        drop(watcher);
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failed_install_cancels_pumps() {
        let parent = CancellationToken::new();
        let mut pump_token = None;

        let res = SignalWatcher::with_pumps(&parent, |pumps| {
            pump_token = Some(pumps.token.clone());
            Err("boom")
        });

        assert_eq!(res.err(), Some("boom"));
        assert!(pump_token.unwrap().is_cancelled());
        assert!(!parent.is_cancelled());
    }
}
