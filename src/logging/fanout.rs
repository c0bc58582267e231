use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::clock::Clock;
use super::error::LogError;
use super::event::LogEvent;
use super::sink::Sink;

/// Delivers every write to all of its sinks, in order
///
/// All sinks are attempted even when an earlier one fails; the first error
/// encountered is returned to the caller.
pub struct FanoutWriter {
    sinks: Vec<Arc<dyn Sink>>,
    clock: Arc<dyn Clock>,
    log_file: Option<PathBuf>,
}

impl FanoutWriter {
    pub fn new(sinks: Vec<Arc<dyn Sink>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sinks,
            clock,
            log_file: None,
        }
    }

    /// Remember which dated file this writer appends to
    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Write one raw event buffer to every sink
    pub async fn write(&self, buf: &[u8]) -> Result<usize, LogError> {
        let mut first_error = None;

        for sink in &self.sinks {
            if let Err(e) = sink.write(buf).await {
                if sink.name() != "database" {
                    tracing::warn!(sink = sink.name(), error = %e, "Log sink write failed");
                }
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(buf.len()),
        }
    }

    /// Stamp, serialize and write an event
    pub async fn log(&self, event: &LogEvent) -> Result<(), LogError> {
        let buf = event.encode(self.clock.now())?;
        self.write(&buf).await.map(|_| ())
    }
}
