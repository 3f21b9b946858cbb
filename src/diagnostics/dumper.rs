//! # Snapshot of the process's execution contexts.

use std::backtrace::Backtrace;
use std::io::{self, Write};
use std::thread;

/// Writes a snapshot of all active execution contexts to a sink.
///
/// Called once, from the termination path; implementations should be fast
/// and must not block on other threads.
pub trait DiagnosticDumper: Send + Sync + 'static {
    /// Writes the snapshot taken "now" into `sink`.
    fn dump(&self, sink: &mut dyn Write) -> io::Result<()>;
}

/// Default dumper.
///
/// Writes, in order:
/// - a header with the process id,
/// - tokio runtime metrics when called inside a runtime,
/// - every OS thread with its name and scheduler state (Linux only),
/// - a forced backtrace of the calling thread.
///
/// ## Limits
/// Only the dumping thread gets a stack trace. Other OS threads are listed by
/// name and state, and async tasks only appear as counts: tokio's task dump
/// (`Handle::dump`) is gated behind `tokio_unstable` and `taskdump`, so no
/// per-task stacks are available. Do not expect a goroutine-style dump of
/// every execution context; plug in a custom [`DiagnosticDumper`] for that.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackDumper;

impl StackDumper {
    /// Creates the default dumper.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn write_runtime(&self, sink: &mut dyn Write) -> io::Result<()> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let metrics = handle.metrics();
                writeln!(
                    sink,
                    "runtime: flavor={:?} workers={} alive_tasks={}",
                    handle.runtime_flavor(),
                    metrics.num_workers(),
                    metrics.num_alive_tasks(),
                )
            }
            Err(_) => writeln!(sink, "runtime: none"),
        }
    }

    #[cfg(target_os = "linux")]
    fn write_threads(&self, sink: &mut dyn Write) -> io::Result<()> {
        let entries = match std::fs::read_dir("/proc/self/task") {
            Ok(entries) => entries,
            Err(e) => return writeln!(sink, "threads: unavailable ({e})"),
        };

        let mut threads: Vec<(u64, String, String)> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let tid = entry.file_name().to_str()?.parse::<u64>().ok()?;
                // threads may exit while we read
                let comm = std::fs::read_to_string(entry.path().join("comm")).ok()?;
                let stat = std::fs::read_to_string(entry.path().join("stat")).ok()?;
                Some((tid, comm.trim().to_string(), thread_state(&stat)))
            })
            .collect();
        threads.sort_unstable_by_key(|(tid, _, _)| *tid);

        writeln!(sink, "threads: {}", threads.len())?;
        for (tid, name, state) in threads {
            writeln!(sink, "  tid={tid} state={state} name={name}")?;
        }
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn write_threads(&self, sink: &mut dyn Write) -> io::Result<()> {
        writeln!(sink, "threads: unavailable on this platform")
    }
}

impl DiagnosticDumper for StackDumper {
    fn dump(&self, sink: &mut dyn Write) -> io::Result<()> {
        writeln!(sink, "=== diagnostic dump: pid {} ===", std::process::id())?;
        self.write_runtime(sink)?;
        self.write_threads(sink)?;

        let current = thread::current();
        writeln!(
            sink,
            "--- backtrace of thread {:?} ({:?}) ---",
            current.name().unwrap_or("<unnamed>"),
            current.id(),
        )?;
        writeln!(sink, "{}", Backtrace::force_capture())?;
        writeln!(sink, "=== end of diagnostic dump ===")
    }
}

/// Extracts the state letter from `/proc/<pid>/task/<tid>/stat`.
///
/// The command name is parenthesised and may itself contain `)`, so the state
/// is the first field after the last `)`.
#[cfg(target_os = "linux")]
fn thread_state(stat: &str) -> String {
    stat.rfind(')')
        .and_then(|i| stat[i + 1..].split_whitespace().next())
        .unwrap_or("?")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_outside_runtime() {
        let mut out = Vec::new();
        StackDumper::new().dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("=== diagnostic dump: pid "));
        assert!(text.contains("runtime: none"));
        assert!(text.contains("--- backtrace of thread"));
        assert!(text.trim_end().ends_with("=== end of diagnostic dump ==="));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dump_inside_runtime_reports_metrics() {
        let mut out = Vec::new();
        StackDumper::new().dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("runtime: flavor=MultiThread workers=2"), "{text}");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_lists_current_threads() {
        let mut out = Vec::new();
        StackDumper::new().dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("threads: "));
        assert!(text.contains("  tid="));
    }

    #[test]
    fn test_only_dumping_thread_gets_a_backtrace() {
        let (park_tx, park_rx) = std::sync::mpsc::channel::<()>();
        let other = thread::Builder::new()
            .name("idle-worker".into())
            .spawn(move || {
                let _ = park_rx.recv();
            })
            .unwrap();

        let mut out = Vec::new();
        StackDumper::new().dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        drop(park_tx);
        other.join().unwrap();

        assert_eq!(text.matches("--- backtrace of thread").count(), 1);
        assert!(!text.contains("--- backtrace of thread \"idle-worker\""));
        #[cfg(target_os = "linux")]
        assert!(text.contains("name=idle-worker"), "{text}");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_thread_state_handles_parens_in_name() {
        assert_eq!(thread_state("42 (we)ird) S 1 2 3"), "S");
        assert_eq!(thread_state("7 (tokio-rt) R 0"), "R");
        assert_eq!(thread_state("garbage"), "?");
    }
}
