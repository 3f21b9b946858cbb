use std::sync::Arc;

use crate::{
    config::ShutdownConfig,
    coordinator::ShutdownCoordinator,
    diagnostics::{DiagnosticDumper, StackDumper},
    exit::{ExitStrategy, ProcessExit},
    signals::{OsSignals, SignalSet, SignalSource},
};

/// Builder for a [`ShutdownCoordinator`].
///
/// Every collaborator has a production default:
/// - signals: [`SignalSet::default`] (SIGINT, SIGTERM)
/// - source: [`OsSignals`]
/// - exit: [`ProcessExit`]
/// - dumper: [`StackDumper`]
pub struct CoordinatorBuilder {
    cfg: ShutdownConfig,
    signals: SignalSet,
    source: Arc<dyn SignalSource>,
    exit: Arc<dyn ExitStrategy>,
    dumper: Arc<dyn DiagnosticDumper>,
}

impl CoordinatorBuilder {
    /// Creates a builder with default configuration and collaborators.
    pub fn new() -> Self {
        Self {
            cfg: ShutdownConfig::default(),
            signals: SignalSet::default(),
            source: Arc::new(OsSignals),
            exit: Arc::new(ProcessExit),
            dumper: Arc::new(StackDumper),
        }
    }

    /// Sets the escalation configuration.
    pub fn with_config(mut self, cfg: ShutdownConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the signal kinds to watch.
    pub fn with_signals(mut self, signals: SignalSet) -> Self {
        self.signals = signals;
        self
    }

    /// Sets where signals come from.
    pub fn with_source(mut self, source: Arc<dyn SignalSource>) -> Self {
        self.source = source;
        self
    }

    /// Sets how the process is terminated.
    pub fn with_exit(mut self, exit: Arc<dyn ExitStrategy>) -> Self {
        self.exit = exit;
        self
    }

    /// Sets the diagnostic dumper used before forced exit.
    pub fn with_dumper(mut self, dumper: Arc<dyn DiagnosticDumper>) -> Self {
        self.dumper = dumper;
        self
    }

    /// Builds the coordinator.
    pub fn build(self) -> ShutdownCoordinator {
        ShutdownCoordinator::new_internal(
            self.cfg,
            self.signals,
            self.source,
            self.exit,
            self.dumper,
        )
    }
}

impl Default for CoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
