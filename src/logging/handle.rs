use arc_swap::ArcSwapOption;
use std::sync::Arc;

use super::error::LogError;
use super::event::{Level, LogEvent};
use super::fanout::FanoutWriter;

/// Process-wide reference to the current [`FanoutWriter`]
///
/// Cloning is cheap; all clones observe the same writer. Replacing the writer
/// is a single atomic swap. Callers that already loaded the old writer finish
/// their write on it; its file closes once the last reference drops.
#[derive(Clone, Default)]
pub struct LoggerHandle {
    current: Arc<ArcSwapOption<FanoutWriter>>,
}

impl LoggerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly built writer
    pub fn install(&self, writer: FanoutWriter) {
        self.current.store(Some(Arc::new(writer)));
    }

    pub fn current(&self) -> Option<Arc<FanoutWriter>> {
        self.current.load_full()
    }

    /// Emit an event through the current writer
    ///
    /// Before a writer is installed events go to the tracing subscriber.
    pub async fn log(&self, event: LogEvent) -> Result<(), LogError> {
        match self.current() {
            Some(writer) => writer.log(&event).await,
            None => {
                trace_event(&event);
                Ok(())
            }
        }
    }

    /// Emit an event, reporting a failure to tracing instead of the caller
    pub async fn log_or_trace(&self, event: LogEvent) {
        if let Err(e) = self.log(event).await {
            tracing::warn!(error = %e, "Failed to write structured log event");
        }
    }
}

fn trace_event(event: &LogEvent) {
    let module = event.module_name().unwrap_or_default();
    let fields = serde_json::Value::Object(event.fields().clone());
    match event.level() {
        Level::Debug => tracing::debug!(module, %fields, "{}", event.message()),
        Level::Info => tracing::info!(module, %fields, "{}", event.message()),
        Level::Warn => tracing::warn!(module, %fields, "{}", event.message()),
        Level::Error | Level::Fatal | Level::Panic => {
            tracing::error!(module, %fields, "{}", event.message())
        }
    }
}
