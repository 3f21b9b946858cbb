//! # Default signal action while nobody watches.
//!
//! tokio keeps its handler installed for the life of the process, so a signal
//! no watcher listens to any more would be caught and then ignored. Every kind
//! watched through [`OsSignals`](crate::OsSignals) therefore also gets a
//! `signal-hook` action that runs the kind's default disposition (terminate,
//! core dump) whenever its watcher count is zero.
//!
//! ```text
//! watchers: 0 ──acquire──► 1..n ──last Interest dropped──► 0
//! default:  armed          disarmed                        armed again
//! ```
//!
//! ## Rules
//! - The action is registered once per kind, on its first watch, and is never
//!   removed. Before that the kernel default is untouched.
//! - Each [`Interest`] counts as one watcher until dropped.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use signal_hook::flag;
use tracing::debug;

use crate::signals::SignalKind;

struct Slot {
    kind: SignalKind,
    /// `true` runs the default action on delivery.
    armed: Arc<AtomicBool>,
    watchers: usize,
}

static SLOTS: Mutex<Vec<Slot>> = Mutex::new(Vec::new());

fn slots() -> MutexGuard<'static, Vec<Slot>> {
    SLOTS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks one watcher of `kind` as alive; dropping it releases the mark.
#[derive(Debug)]
pub(crate) struct Interest {
    kind: SignalKind,
}

impl Interest {
    /// Registers the default-action hook on first use, then counts a watcher.
    pub(crate) fn acquire(kind: SignalKind) -> io::Result<Self> {
        let mut slots = slots();
        let idx = match slots.iter().position(|s| s.kind == kind) {
            Some(idx) => idx,
            None => {
                let armed = Arc::new(AtomicBool::new(false));
                flag::register_conditional_default(
                    kind.to_unix().as_raw_value(),
                    Arc::clone(&armed),
                )?;
                slots.push(Slot {
                    kind,
                    armed,
                    watchers: 0,
                });
                slots.len() - 1
            }
        };

        let slot = &mut slots[idx];
        slot.watchers += 1;
        slot.armed.store(false, Ordering::SeqCst);
        Ok(Self { kind })
    }
}

impl Drop for Interest {
    fn drop(&mut self) {
        let mut slots = slots();
        let Some(slot) = slots.iter_mut().find(|s| s.kind == self.kind) else {
            return;
        };
        slot.watchers = slot.watchers.saturating_sub(1);
        if slot.watchers == 0 {
            slot.armed.store(true, Ordering::SeqCst);
            debug!(signal = %self.kind, "no watchers left, default action restored");
        }
    }
}

/// Whether delivering `kind` now would run its default action.
///
/// `None` when `kind` was never watched (the kernel default applies).
#[cfg(test)]
pub(crate) fn default_armed(kind: SignalKind) -> Option<bool> {
    slots()
        .iter()
        .find(|s| s.kind == kind)
        .map(|s| s.armed.load(Ordering::SeqCst))
}
