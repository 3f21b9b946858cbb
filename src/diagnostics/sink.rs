//! # LogSink: an `io::Write` that logs.
//!
//! Bytes are buffered until a newline; every complete line becomes one
//! `tracing` event at the sink's level. A trailing partial line is emitted on
//! [`flush`](std::io::Write::flush) or drop.

use std::io;

use tracing::Level;

/// Target used for dump lines, so they can be filtered separately.
const TARGET: &str = "sigvisor::dump";

/// Line-oriented writer into the log.
#[derive(Debug)]
pub struct LogSink {
    level: Level,
    buf: Vec<u8>,
}

impl LogSink {
    /// Creates a sink emitting at `level`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }

    fn emit(&self, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        let text = text.trim_end_matches('\r');

        match self.level {
            Level::ERROR => tracing::error!(target: TARGET, "{text}"),
            Level::WARN => tracing::warn!(target: TARGET, "{text}"),
            Level::INFO => tracing::info!(target: TARGET, "{text}"),
            Level::DEBUG => tracing::debug!(target: TARGET, "{text}"),
            _ => tracing::trace!(target: TARGET, "{text}"),
        }
    }

    fn drain_lines(&mut self) {
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            self.emit(&line[..line.len() - 1]);
        }
    }
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        self.drain_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let rest = std::mem::take(&mut self.buf);
            self.emit(&rest);
        }
        Ok(())
    }
}

impl Drop for LogSink {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
