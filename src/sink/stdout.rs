use std::io::Write;
use std::thread;

use tokio::sync::mpsc;

use super::{EmitSink, SinkError};
use crate::logger;
use crate::payload::OutboundMapping;

/// Writes each mapping as one JSON line on stdout
///
/// Intended for a host that spawns the bridge and reads its stdout; logs go
/// to stderr so the stream stays machine-readable. Writes happen on a
/// dedicated thread, so a host that stops reading the pipe backs up lines in
/// memory instead of stalling request handling.
#[derive(Debug, Clone)]
pub struct StdoutSink {
    lines: mpsc::UnboundedSender<String>,
}

impl StdoutSink {
    pub fn spawn() -> Result<Self, SinkError> {
        Self::with_writer(std::io::stdout())
    }

    /// Same as [`StdoutSink::spawn`], writing to `out` instead of stdout
    pub fn with_writer<W: Write + Send + 'static>(mut out: W) -> Result<Self, SinkError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        thread::Builder::new()
            .name("stdout-sink".to_string())
            .spawn(move || {
                while let Some(line) = rx.blocking_recv() {
                    if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
                        // Dropping the receiver turns later deliveries into errors
                        logger::log_error(&format!("Host stdout write failed: {e}"));
                        break;
                    }
                }
            })?;

        Ok(Self { lines: tx })
    }
}

impl EmitSink for StdoutSink {
    fn deliver(&self, mapping: &OutboundMapping) -> Result<(), SinkError> {
        let line = mapping.to_json()?;
        self.lines.send(line).map_err(|_| SinkError::Closed)
    }
}
