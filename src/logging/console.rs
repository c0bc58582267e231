use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::Mutex;

use super::error::LogError;
use super::format::render_line;
use super::sink::Sink;

/// Colored, human-readable terminal output
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl ConsoleSink {
    pub fn new(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()), true)
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn write(&self, buf: &[u8]) -> Result<usize, LogError> {
        let line = render_line(buf, self.color);
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        out.write_all(line.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|source| LogError::Io {
                sink: "console",
                source,
            })?;
        Ok(buf.len())
    }
}
