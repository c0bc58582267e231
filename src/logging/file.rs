//! Date-stamped, append-only log file sink

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fs::{DirBuilder, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::LogError;
use super::format::render_line;
use super::sink::Sink;

/// Prefix of every log file name
pub const LOG_FILE_PREFIX: &str = "moneybotsapi";

/// `moneybotsapi-2024-01-15.log`
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{}-{}.log", LOG_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Writes each event as one uncolored line to the file for a single day
///
/// The handle is closed when the sink is dropped.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open (creating if needed) the file for `date` inside `dir`
    pub fn open(dir: &Path, date: NaiveDate) -> Result<Self, LogError> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder.create(dir).map_err(|source| LogError::OpenFile {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(log_file_name(date));

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let file = options.open(&path).map_err(|source| LogError::OpenFile {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Sink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn write(&self, buf: &[u8]) -> Result<usize, LogError> {
        let line = render_line(buf, false);
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.write_all(line.as_bytes())
            .map_err(|source| LogError::Io { sink: "file", source })?;
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(log_file_name(date(2024, 1, 15)), "moneybotsapi-2024-01-15.log");
    }

    #[tokio::test]
    async fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("var").join("log");

        let sink = FileSink::open(&nested, date(2024, 1, 15)).unwrap();
        assert!(sink.path().exists());
        assert_eq!(sink.path(), nested.join("moneybotsapi-2024-01-15.log"));
    }

    #[tokio::test]
    async fn test_write_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let first = FileSink::open(dir.path(), date(2024, 1, 15)).unwrap();
        first.write(br#"{"level":"info","message":"one"}"#).await.unwrap();
        drop(first);

        let second = FileSink::open(dir.path(), date(2024, 1, 15)).unwrap();
        second.write(br#"{"level":"info","message":"two"}"#).await.unwrap();

        let content = std::fs::read_to_string(second.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["INFO   one", "INFO   two"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::open(dir.path(), date(2024, 1, 15)).unwrap();
        let mode = std::fs::metadata(sink.path()).unwrap().permissions().mode();
        // umask may only remove bits
        assert_eq!(mode & 0o600, 0o600);
        assert_eq!(mode & 0o133, 0);
    }

    #[test]
    fn test_open_fails_when_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let result = FileSink::open(&blocker, date(2024, 1, 15));
        assert!(matches!(result, Err(LogError::OpenFile { .. })));
    }
}
