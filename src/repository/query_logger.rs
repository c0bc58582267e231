//! Query observability hook
//!
//! Decides, for every statement the [`Database`](super::Database) runs,
//! whether and how it should appear in the structured log.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use crate::logging::LogEvent;

/// Statements touching the log table are never logged (they would recurse).
const LOG_TABLE_MARKER: &str = "\"logs\"";

/// Successful statements slower than this are logged at `info`
pub const SLOW_QUERY_MS: f64 = 100.0;

/// Verbosity of the query hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryLogLevel {
    Silent,
    Error,
    Warn,
    Info,
    Debug,
}

impl QueryLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl From<&str> for QueryLogLevel {
    /// Case-insensitive; anything unrecognized means `info`
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "silent" => Self::Silent,
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for QueryLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement kind, taken from the leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Alter,
    Drop,
    Set,
    Unknown,
}

impl Operation {
    const KEYWORDS: [(&'static str, Operation); 8] = [
        ("SELECT", Operation::Select),
        ("INSERT", Operation::Insert),
        ("UPDATE", Operation::Update),
        ("DELETE", Operation::Delete),
        ("CREATE", Operation::Create),
        ("ALTER", Operation::Alter),
        ("DROP", Operation::Drop),
        ("SET", Operation::Set),
    ];

    pub fn classify(query: &str) -> Self {
        let normalized = query.trim().to_uppercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| normalized.starts_with(keyword))
            .map(|(_, operation)| *operation)
            .unwrap_or(Operation::Unknown)
    }

    /// CREATE, ALTER and DROP
    pub fn is_schema_change(&self) -> bool {
        matches!(self, Self::Create | Self::Alter | Self::Drop)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
            Self::Set => "SET",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remove identifier quoting and collapse whitespace
pub fn clean_query(query: &str) -> String {
    static QUOTED: OnceLock<Regex> = OnceLock::new();
    let quoted = QUOTED.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));

    let unquoted = quoted.replace_all(query, "$1");
    unquoted.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One observed statement
#[derive(Debug, Clone)]
pub struct QueryEvent<'a> {
    pub query: &'a str,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl QueryEvent<'_> {
    pub fn duration_ms(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / 1_000_000.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueryLogger {
    level: QueryLogLevel,
}

impl QueryLogger {
    pub fn new(level: QueryLogLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> QueryLogLevel {
        self.level
    }

    /// The log event for `event`, if it should be logged at all
    ///
    /// Errors are logged at every verbosity. `debug` logs every statement
    /// with its text; `info` logs schema changes and slow statements.
    pub fn evaluate(&self, event: &QueryEvent<'_>) -> Option<LogEvent> {
        if event.query.contains(LOG_TABLE_MARKER) {
            return None;
        }

        let operation = Operation::classify(event.query);
        let duration_ms = event.duration_ms();

        if let Some(error) = &event.error {
            return Some(
                LogEvent::error("Database query error")
                    .module("database")
                    .field("operation", operation.as_str())
                    .field("duration_ms", duration_ms)
                    .field("query", clean_query(event.query))
                    .field("error", error.as_str()),
            );
        }

        match self.level {
            QueryLogLevel::Debug => Some(
                LogEvent::debug("Database query executed")
                    .module("database")
                    .field("operation", operation.as_str())
                    .field("duration_ms", duration_ms)
                    .field("query", clean_query(event.query)),
            ),
            QueryLogLevel::Info
                if operation.is_schema_change() || duration_ms > SLOW_QUERY_MS =>
            {
                Some(
                    LogEvent::info("Database query completed")
                        .module("database")
                        .field("operation", operation.as_str())
                        .field("duration_ms", duration_ms),
                )
            }
            _ => None,
        }
    }
}
