//! Structured application logging
//!
//! Every event is delivered synchronously to three sinks:
//! - **console**: colored, human-readable lines on stdout
//! - **file**: the same lines, uncolored, in `moneybotsapi-<date>.log`
//! - **database**: one row per event in the `logs` table
//!
//! ```text
//! LogEvent -> LoggerHandle -> FanoutWriter -> console -> file -> database
//!                  ^
//!                  └── Rotator swaps in a new writer at local midnight
//! ```
//!
//! There is no buffering or batching; a failed database insert is returned to
//! the caller.

pub mod clock;
pub mod console;
pub mod error;
pub mod event;
pub mod fanout;
pub mod file;
pub mod format;
pub mod handle;
pub mod persistent;
pub mod rotation;
pub mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use console::ConsoleSink;
pub use error::LogError;
pub use event::{Level, LogEvent};
pub use fanout::FanoutWriter;
pub use file::{log_file_name, FileSink};
pub use handle::LoggerHandle;
pub use persistent::{LogRecord, LogStore, PersistentSink};
pub use rotation::{LoggerFactory, Rotator};
pub use sink::Sink;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::signals::ShutdownSignal;

/// Install today's writer into `handle` and start the daily rotation task
///
/// Fails if today's log file cannot be opened; the caller should treat that
/// as fatal.
pub fn init_logger(
    store: Arc<dyn LogStore>,
    log_dir: PathBuf,
    handle: LoggerHandle,
    shutdown: broadcast::Receiver<ShutdownSignal>,
) -> Result<JoinHandle<()>, LogError> {
    let factory = LoggerFactory::new(
        log_dir,
        Arc::new(ConsoleSink::stdout()),
        Arc::new(PersistentSink::new(store)),
        Arc::new(SystemClock),
    );

    let rotator = Rotator::new(factory, handle);
    let path = rotator.rotate()?;
    tracing::info!(path = %path.display(), "Structured logger initialized");

    Ok(rotator.spawn(shutdown))
}
