//! # Coordinator configuration.
//!
//! [`ShutdownConfig`] holds the escalation settings of a
//! [`ShutdownCoordinator`](crate::ShutdownCoordinator). The signal kinds and the
//! collaborators (exit strategy, dumper, signal source) are injected through
//! [`CoordinatorBuilder`](crate::CoordinatorBuilder).
//!
//! ## Sentinel values
//! - `max_shutdown_duration = 0s` → escalate as soon as the first signal was handled

use std::time::Duration;

use tracing::Level;

/// Escalation settings for one coordinator.
///
/// ## Field semantics
/// - `name`: label attached to the coordinator's tracing span
/// - `max_shutdown_duration`: time between the first signal and forced exit
/// - `second_signal_exit_code`: exit code when the operator repeats the signal
/// - `timeout_exit_code`: exit code when `max_shutdown_duration` elapses
/// - `dump_on_second_signal`: also write a diagnostic dump on the operator path
/// - `dump_level`: level of the log events carrying the diagnostic dump
///
/// # Example
/// ```
/// use std::time::Duration;
/// use sigvisor::ShutdownConfig;
///
/// let mut cfg = ShutdownConfig::default();
/// cfg.max_shutdown_duration = Duration::from_secs(30);
///
/// assert_eq!(cfg.second_signal_exit_code, 2);
/// assert_eq!(cfg.timeout_exit_code, 1);
/// ```
#[derive(Clone, Debug)]
pub struct ShutdownConfig {
    /// Name of the coordinator in logs.
    pub name: String,

    /// Maximum time the shutdown routine gets before the process is terminated.
    pub max_shutdown_duration: Duration,

    /// Exit code used when a second signal forces termination.
    pub second_signal_exit_code: i32,

    /// Exit code used when the shutdown routine runs out of time.
    pub timeout_exit_code: i32,

    /// Whether a second signal also triggers a diagnostic dump.
    ///
    /// The timeout path always dumps.
    pub dump_on_second_signal: bool,

    /// Log level of the diagnostic dump lines.
    pub dump_level: Level,
}

impl Default for ShutdownConfig {
    /// Default configuration:
    ///
    /// - `name = "sig-handler"`
    /// - `max_shutdown_duration = 10s`
    /// - `second_signal_exit_code = 2`
    /// - `timeout_exit_code = 1`
    /// - `dump_on_second_signal = false`
    /// - `dump_level = ERROR`
    fn default() -> Self {
        Self {
            name: "sig-handler".to_string(),
            max_shutdown_duration: Duration::from_secs(10),
            second_signal_exit_code: 2,
            timeout_exit_code: 1,
            dump_on_second_signal: false,
            dump_level: Level::ERROR,
        }
    }
}
