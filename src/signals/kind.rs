//! # Signal kinds and the configured set of kinds to watch.

use std::fmt;

/// A termination-related signal the coordinator can react to.
///
/// On non-Unix platforms only [`SignalKind::Interrupt`] (Ctrl-C) can be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalKind {
    /// `SIGINT` (Ctrl-C in a terminal).
    Interrupt,
    /// `SIGTERM` (default kill signal, used by systemd/Kubernetes).
    Terminate,
    /// `SIGQUIT`.
    Quit,
    /// `SIGHUP` (controlling terminal closed).
    Hangup,
    /// `SIGUSR1`.
    User1,
    /// `SIGUSR2`.
    User2,
}

impl SignalKind {
    /// Conventional signal name, e.g. `"SIGINT"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Interrupt => "SIGINT",
            SignalKind::Terminate => "SIGTERM",
            SignalKind::Quit => "SIGQUIT",
            SignalKind::Hangup => "SIGHUP",
            SignalKind::User1 => "SIGUSR1",
            SignalKind::User2 => "SIGUSR2",
        }
    }

    #[cfg(unix)]
    pub(crate) fn to_unix(self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind as Unix;

        match self {
            SignalKind::Interrupt => Unix::interrupt(),
            SignalKind::Terminate => Unix::terminate(),
            SignalKind::Quit => Unix::quit(),
            SignalKind::Hangup => Unix::hangup(),
            SignalKind::User1 => Unix::user_defined1(),
            SignalKind::User2 => Unix::user_defined2(),
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The collection of signal kinds a coordinator watches.
///
/// Duplicates are removed, insertion order is kept. The set is fixed once
/// handed to a coordinator.
///
/// # Example
/// ```
/// use sigvisor::{SignalKind, SignalSet};
///
/// let set = SignalSet::default();
/// assert!(set.contains(SignalKind::Interrupt));
/// assert!(set.contains(SignalKind::Terminate));
/// assert_eq!(set.len(), 2);
///
/// let custom: SignalSet = [SignalKind::Hangup, SignalKind::Hangup].into_iter().collect();
/// assert_eq!(custom.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSet {
    kinds: Vec<SignalKind>,
}

impl SignalSet {
    /// Builds a set from the given kinds, dropping duplicates.
    pub fn new(kinds: impl IntoIterator<Item = SignalKind>) -> Self {
        let mut out = Vec::new();
        for kind in kinds {
            if !out.contains(&kind) {
                out.push(kind);
            }
        }
        Self { kinds: out }
    }

    /// Reports whether `kind` is watched.
    #[inline]
    pub fn contains(&self, kind: SignalKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Iterates the kinds in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = SignalKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Number of distinct kinds.
    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no kind is watched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for SignalSet {
    /// `{SIGINT, SIGTERM}`.
    fn default() -> Self {
        Self::new([SignalKind::Interrupt, SignalKind::Terminate])
    }
}

impl FromIterator<SignalKind> for SignalSet {
    fn from_iter<I: IntoIterator<Item = SignalKind>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for SignalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.kinds.iter().map(SignalKind::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
