//! Structured log events
//!
//! A [`LogEvent`] is built at the call site and serialized once into a JSON
//! object (one line), which is the buffer every sink receives.

use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::error::LogError;

/// Field names owned by the event itself; extra fields with these names are dropped.
pub const RESERVED_FIELDS: [&str; 4] = ["level", "message", "module", "time"];

/// Severity of a log event, serialized as lowercase text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured log record
///
/// # Example
///
/// ```ignore
/// let event = LogEvent::info("API request")
///     .module("http")
///     .field("method", "GET")
///     .field("path", "/");
/// logger.log(event).await?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    level: Level,
    message: String,
    module: Option<String>,
    fields: Map<String, Value>,
}

impl LogEvent {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            module: None,
            fields: Map::new(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(Level::Debug, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Level::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    /// Tag the event with the emitting subsystem
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Attach an extra field
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach an error under the `error` key
    pub fn err(self, error: &dyn fmt::Display) -> Self {
        self.field("error", error.to_string())
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Build the JSON object written to the sinks, stamped with `time`
    pub fn to_json(&self, time: DateTime<Local>) -> Value {
        let mut object = Map::new();
        object.insert("level".to_string(), Value::from(self.level.as_str()));
        if let Some(module) = &self.module {
            object.insert("module".to_string(), Value::from(module.as_str()));
        }
        for (key, value) in &self.fields {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            object.insert(key.clone(), value.clone());
        }
        object.insert(
            "time".to_string(),
            Value::from(time.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        object.insert("message".to_string(), Value::from(self.message.as_str()));
        Value::Object(object)
    }

    /// Serialize into a newline-terminated JSON buffer
    pub fn encode(&self, time: DateTime<Local>) -> Result<Vec<u8>, LogError> {
        let mut buf = serde_json::to_vec(&self.to_json(time))?;
        buf.push(b'\n');
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).earliest().unwrap()
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), "\"warn\"");
        assert_eq!(Level::Fatal.to_string(), "fatal");
    }

    #[test]
    fn test_encode_contains_all_fields() {
        let event = LogEvent::error("boom")
            .module("http")
            .field("status", 500)
            .field("path", "/auth/login");

        let buf = event.encode(fixed_time()).unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));

        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["message"], "boom");
        assert_eq!(value["module"], "http");
        assert_eq!(value["status"], 500);
        assert_eq!(value["path"], "/auth/login");
        assert!(value["time"].as_str().unwrap().starts_with("2024-01-15T10:30:00"));
    }

    #[test]
    fn test_module_absent_when_not_set() {
        let value = LogEvent::info("hello").to_json(fixed_time());
        assert!(value.get("module").is_none());
    }

    #[test]
    fn test_reserved_field_names_are_dropped() {
        let value = LogEvent::info("real message")
            .field("message", "shadow")
            .field("time", "yesterday")
            .to_json(fixed_time());

        assert_eq!(value["message"], "real message");
        assert_ne!(value["time"], "yesterday");
    }

    #[test]
    fn test_err_helper() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let event = LogEvent::error("write failed").err(&error);
        assert_eq!(event.fields()["error"], "disk full");
    }
}
