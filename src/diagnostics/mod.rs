//! # Best-effort diagnostics captured right before a forced exit.
//!
//! ```text
//! timeout ──► dump_best_effort(dumper, LogSink::new(Level::ERROR))
//!                 ├─ dumper.dump(&mut sink)   errors ignored
//!                 ├─ sink.flush()             errors ignored
//!                 └─ drop(sink)
//! ```
//!
//! - [`DiagnosticDumper`] writes a snapshot of what the process is doing.
//! - [`StackDumper`] is the default: runtime metrics, OS threads, current backtrace.
//! - [`LogSink`] turns written bytes into `tracing` events, one per line.
//!
//! Nothing here may stop the termination path: write errors, flush errors and
//! panics inside a dumper are swallowed.

mod dumper;
mod sink;

use std::io::Write;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::debug;

pub use dumper::{DiagnosticDumper, StackDumper};
pub use sink::LogSink;

/// Writes a dump into `sink`, then flushes and closes it, ignoring every failure.
pub fn dump_best_effort<W: Write>(dumper: &dyn DiagnosticDumper, mut sink: W) {
    let res = catch_unwind(AssertUnwindSafe(|| {
        if let Err(e) = dumper.dump(&mut sink) {
            debug!(error = %e, "diagnostic dump failed");
        }
        if let Err(e) = sink.flush() {
            debug!(error = %e, "diagnostic sink flush failed");
        }
    }));
    if res.is_err() {
        debug!("diagnostic dumper panicked");
    }
}
