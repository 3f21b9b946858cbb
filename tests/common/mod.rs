//! Log capture shared by the integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;

/// In-memory log output; also accepts markers so side effects can be ordered
/// against log lines.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    /// Routes this thread's `tracing` output (INFO and above, no colours, no
    /// timestamps) into the capture until the guard drops.
    ///
    /// Tasks polled on the same thread log here too, so use it from a
    /// `current_thread` runtime.
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Appends a line of its own.
    pub fn mark(&self, line: &str) {
        let mut buf = self.0.lock().unwrap();
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Index of the first line containing every one of `parts`.
    pub fn position(&self, parts: &[&str]) -> Option<usize> {
        self.lines()
            .iter()
            .position(|line| parts.iter().all(|p| line.contains(p)))
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
