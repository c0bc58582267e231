//! Database-backed log sink
//!
//! Every write performs exactly one synchronous insert into the `logs` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::error::LogError;
use super::sink::Sink;

/// Rendered in place of a missing `level` or `message`
pub const MISSING_VALUE: &str = "<nil>";

/// One row of the `logs` table
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: String,
    pub module: String,
    /// Every emitted field except `time`
    pub data: Value,
}

impl LogRecord {
    /// Parse a raw event buffer into a record stamped with `timestamp`
    pub fn from_event(buf: &[u8], timestamp: DateTime<Utc>) -> Result<Self, LogError> {
        let mut object: Map<String, Value> = match serde_json::from_slice(buf)? {
            Value::Object(object) => object,
            _ => return Err(LogError::NotAnObject),
        };

        let level = coerce_text(object.get("level"));
        let message = coerce_text(object.get("message"));
        let module = match object.get("module") {
            Some(Value::String(module)) => module.clone(),
            _ => String::new(),
        };

        object.remove("time");

        Ok(Self {
            timestamp,
            level,
            message,
            module,
            data: Value::Object(object),
        })
    }
}

fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => MISSING_VALUE.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Durable, append-only storage for log records
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn insert_log(&self, record: &LogRecord) -> Result<(), sqlx::Error>;
}

pub struct PersistentSink {
    store: Arc<dyn LogStore>,
}

impl PersistentSink {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Sink for PersistentSink {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn write(&self, buf: &[u8]) -> Result<usize, LogError> {
        let record = LogRecord::from_event(buf, Utc::now())?;

        if let Err(e) = self.store.insert_log(&record).await {
            eprintln!("Failed to write log to database: {}", e);
            return Err(LogError::Persist(e));
        }

        Ok(buf.len())
    }
}
