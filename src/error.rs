//! Error types used by the shutdown coordinator and its utilities.
//!
//! This module defines two error enums:
//!
//! - [`SignalError`]: failures while subscribing to termination signals.
//! - [`RandError`]: failures of the secure random generator.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logs.
//! Cancellation and forced termination are lifecycle outcomes, not errors,
//! and are reported through [`CoordinatorState`](crate::CoordinatorState).

use thiserror::Error;

use crate::signals::SignalKind;

/// # Errors produced while subscribing to signals.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SignalError {
    /// Installing the OS listener for a signal kind failed.
    #[error("failed to register listener for {kind}: {source}")]
    Register {
        /// The signal kind that could not be registered.
        kind: SignalKind,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The signal kind cannot be delivered on this platform.
    #[error("signal {kind} is not supported on this platform")]
    Unsupported {
        /// The rejected signal kind.
        kind: SignalKind,
    },
}

impl SignalError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use sigvisor::{SignalError, SignalKind};
    ///
    /// let err = SignalError::Unsupported { kind: SignalKind::Hangup };
    /// assert_eq!(err.as_label(), "signal_unsupported");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SignalError::Register { .. } => "signal_register_failed",
            SignalError::Unsupported { .. } => "signal_unsupported",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SignalError::Register { kind, source } => format!("register {kind}: {source}"),
            SignalError::Unsupported { kind } => format!("unsupported: {kind}"),
        }
    }
}

/// # Errors produced by secure random generation.
///
/// The generator never degrades to a non-cryptographic source; a failure is
/// either returned as [`RandError::Source`] or turned into a panic by the
/// `must_*` entry points of [`SecureRandom`](crate::SecureRandom).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RandError {
    /// The underlying generator reported a failure.
    #[error("secure random source failed: {message}")]
    Source {
        /// The generator's error message.
        message: String,
    },

    /// A non-empty string was requested over an empty alphabet.
    #[error("cannot draw characters from an empty alphabet")]
    EmptyAlphabet,
}

impl RandError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use sigvisor::RandError;
    ///
    /// assert_eq!(RandError::EmptyAlphabet.as_label(), "rand_empty_alphabet");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RandError::Source { .. } => "rand_source_failed",
            RandError::EmptyAlphabet => "rand_empty_alphabet",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RandError::Source { message } => format!("source: {message}"),
            RandError::EmptyAlphabet => "empty alphabet".to_string(),
        }
    }
}
