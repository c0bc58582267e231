//! Daily log file rotation
//!
//! The [`Rotator`] sleeps until the next local midnight, builds a new
//! [`FanoutWriter`] targeting the new day's file and swaps it into the
//! [`LoggerHandle`]. A failed rotation is reported through the writer that is
//! still installed and retried on the next cycle.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::clock::{until_next_midnight, Clock};
use super::console::ConsoleSink;
use super::error::LogError;
use super::event::LogEvent;
use super::fanout::FanoutWriter;
use super::file::FileSink;
use super::handle::LoggerHandle;
use super::persistent::PersistentSink;
use super::sink::Sink;
use crate::signals::ShutdownSignal;

/// Builds fan-out writers for the current date
///
/// Console and persistent sinks are shared between writers; only the file
/// sink is rebuilt.
pub struct LoggerFactory {
    log_dir: PathBuf,
    console: Arc<ConsoleSink>,
    persistent: Arc<PersistentSink>,
    clock: Arc<dyn Clock>,
}

impl LoggerFactory {
    pub fn new(
        log_dir: PathBuf,
        console: Arc<ConsoleSink>,
        persistent: Arc<PersistentSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            log_dir,
            console,
            persistent,
            clock,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Writer for today's file: console, file, then database
    pub fn build(&self) -> Result<FanoutWriter, LogError> {
        let today = self.clock.now().date_naive();
        let file = FileSink::open(&self.log_dir, today)?;
        let path = file.path().to_path_buf();

        let sinks: Vec<Arc<dyn Sink>> = vec![
            self.console.clone(),
            Arc::new(file),
            self.persistent.clone(),
        ];

        Ok(FanoutWriter::new(sinks, self.clock.clone()).with_log_file(path))
    }
}

pub struct Rotator {
    factory: LoggerFactory,
    handle: LoggerHandle,
}

impl Rotator {
    pub fn new(factory: LoggerFactory, handle: LoggerHandle) -> Self {
        Self { factory, handle }
    }

    /// Build a writer for the current date and install it
    ///
    /// On error the previously installed writer stays in place.
    pub fn rotate(&self) -> Result<PathBuf, LogError> {
        let writer = self.factory.build()?;
        let path = writer
            .log_file()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        self.handle.install(writer);
        Ok(path)
    }

    /// Rotate at every local midnight until shutdown
    pub async fn run(self, mut shutdown: broadcast::Receiver<ShutdownSignal>) {
        loop {
            let wait = until_next_midnight(self.factory.clock().now());
            tracing::debug!(wait_secs = wait.as_secs(), "Next log rotation scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Log rotation task stopping");
                    break;
                }
            }

            match self.rotate() {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "Log file rotated");
                }
                Err(e) => {
                    let event = LogEvent::error("Failed to rotate log file")
                        .module("logger")
                        .err(&e);
                    if let Err(log_err) = self.handle.log(event).await {
                        tracing::error!(
                            error = %e,
                            log_error = %log_err,
                            "Failed to rotate log file"
                        );
                    }
                }
            }
        }
    }

    pub fn spawn(self, shutdown: broadcast::Receiver<ShutdownSignal>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::clock::ManualClock;
    use crate::logging::persistent::{LogRecord, LogStore};
    use async_trait::async_trait;
    use chrono::{DateTime, Local, TimeZone};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore(Mutex<Vec<LogRecord>>);

    #[async_trait]
    impl LogStore for MemoryStore {
        async fn insert_log(&self, record: &LogRecord) -> Result<(), sqlx::Error> {
            self.0.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, s).earliest().unwrap()
    }

    fn rotator(dir: PathBuf, clock: Arc<ManualClock>) -> (Rotator, LoggerHandle, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let factory = LoggerFactory::new(
            dir,
            Arc::new(ConsoleSink::new(Box::new(std::io::sink()), false)),
            Arc::new(PersistentSink::new(store.clone())),
            clock,
        );
        let handle = LoggerHandle::new();
        (Rotator::new(factory, handle.clone()), handle, store)
    }

    #[tokio::test]
    async fn test_rotate_targets_file_for_each_day() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(local(2024, 1, 15, 9, 0, 0)));
        let (rotator, handle, _) = rotator(dir.path().to_path_buf(), clock.clone());

        let first = rotator.rotate().unwrap();
        handle.log(LogEvent::info("day one")).await.unwrap();

        clock.set(local(2024, 1, 16, 0, 0, 1));
        let second = rotator.rotate().unwrap();
        handle.log(LogEvent::info("day two")).await.unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with("moneybotsapi-2024-01-15.log"));
        assert!(second.ends_with("moneybotsapi-2024-01-16.log"));

        let day_one = std::fs::read_to_string(&first).unwrap();
        let day_two = std::fs::read_to_string(&second).unwrap();
        assert!(day_one.contains("day one") && !day_one.contains("day two"));
        assert!(day_two.contains("day two") && !day_two.contains("day one"));
    }

    #[tokio::test]
    async fn test_failed_rotation_keeps_previous_writer() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let clock = Arc::new(ManualClock::new(local(2024, 1, 15, 9, 0, 0)));
        let (rotator, handle, _) = rotator(log_dir.clone(), clock.clone());

        let first = rotator.rotate().unwrap();

        // The next day's file cannot be created: a directory sits at its path
        std::fs::create_dir(log_dir.join("moneybotsapi-2024-01-16.log")).unwrap();
        clock.set(local(2024, 1, 16, 0, 0, 1));
        assert!(rotator.rotate().is_err());

        let current = handle.current().unwrap();
        assert_eq!(current.log_file(), Some(first.as_path()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_rotates_at_midnight_and_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(local(2024, 1, 15, 23, 59, 59)));
        let (rotator, handle, store) = rotator(dir.path().to_path_buf(), clock.clone());
        rotator.rotate().unwrap();

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = rotator.spawn(shutdown_rx);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        clock.set(local(2024, 1, 16, 0, 0, 0));
        tokio::time::advance(std::time::Duration::from_secs(1)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let current = handle.current().unwrap();
        assert!(current
            .log_file()
            .unwrap()
            .ends_with("moneybotsapi-2024-01-16.log"));
        assert!(store.0.lock().unwrap().is_empty());

        shutdown_tx.send(ShutdownSignal::Graceful).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reports_failed_rotation_and_retries_next_day() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let clock = Arc::new(ManualClock::new(local(2024, 1, 15, 23, 59, 59)));
        let (rotator, handle, store) = rotator(log_dir.clone(), clock.clone());
        let first = rotator.rotate().unwrap();

        let blocker = log_dir.join("moneybotsapi-2024-01-16.log");
        std::fs::create_dir(&blocker).unwrap();

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = rotator.spawn(shutdown_rx);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        clock.set(local(2024, 1, 16, 0, 0, 0));
        tokio::time::advance(std::time::Duration::from_secs(1)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        {
            let records = store.0.lock().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].message, "Failed to rotate log file");
            assert_eq!(records[0].module, "logger");
            assert_eq!(records[0].level, "error");
        }
        let current = handle.current().unwrap();
        assert_eq!(current.log_file(), Some(first.as_path()));

        std::fs::remove_dir(&blocker).unwrap();
        clock.set(local(2024, 1, 17, 0, 0, 0));
        tokio::time::advance(std::time::Duration::from_secs(24 * 60 * 60)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let current = handle.current().unwrap();
        assert!(current
            .log_file()
            .unwrap()
            .ends_with("moneybotsapi-2024-01-17.log"));
        assert_eq!(store.0.lock().unwrap().len(), 1);

        shutdown_tx.send(ShutdownSignal::Graceful).unwrap();
        task.await.unwrap();
    }
}
