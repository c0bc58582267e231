//! Human-readable rendering shared by the console and file sinks
//!
//! Layout: `LEVEL  TIMESTAMP MESSAGE key=value ...`

use colored::{ColoredString, Colorize};
use serde_json::{Map, Value};

const LEVEL_WIDTH: usize = 6;
const UNKNOWN_LEVEL: &str = "????";

/// Render one raw event buffer as a single line (newline included)
///
/// Never fails: buffers that are not a JSON object are passed through as text.
pub fn render_line(buf: &[u8], color: bool) -> String {
    let object = match serde_json::from_slice::<Value>(buf) {
        Ok(Value::Object(object)) => object,
        _ => {
            let mut line = String::from_utf8_lossy(buf).trim_end().to_string();
            line.push('\n');
            return line;
        }
    };

    let mut parts: Vec<String> = Vec::with_capacity(4);
    parts.push(format_level(object.get("level"), color));

    if let Some(time) = object.get("time").and_then(Value::as_str) {
        parts.push(time.to_string());
    }

    match object.get("message") {
        Some(Value::String(message)) => parts.push(message.clone()),
        Some(Value::Null) | None => {}
        Some(other) => parts.push(other.to_string()),
    }

    let fields = format_fields(&object, color);
    if !fields.is_empty() {
        parts.push(fields);
    }

    let mut line = parts.join(" ");
    line.push('\n');
    line
}

fn format_level(level: Option<&Value>, color: bool) -> String {
    let Some(level) = level.and_then(Value::as_str) else {
        return UNKNOWN_LEVEL.to_string();
    };

    let tag = format!("{:<width$}", level.to_uppercase(), width = LEVEL_WIDTH);
    if !color {
        return tag;
    }

    let colored: ColoredString = match level {
        "debug" => tag.cyan(),
        "info" => tag.blue(),
        "warn" => tag.yellow(),
        "error" => tag.red(),
        "fatal" | "panic" => tag.magenta(),
        _ => tag.white(),
    };
    colored.to_string()
}

fn format_fields(object: &Map<String, Value>, color: bool) -> String {
    let mut keys: Vec<&String> = object
        .keys()
        .filter(|key| !matches!(key.as_str(), "level" | "time" | "message"))
        .collect();
    keys.sort();

    keys.into_iter()
        .map(|key| {
            let name = if color {
                key.green().to_string()
            } else {
                key.clone()
            };
            format!("{}={}", name, format_value(&object[key.as_str()]))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) if needs_quote(text) => format!("{:?}", text),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn needs_quote(text: &str) -> bool {
    text.is_empty()
        || text
            .chars()
            .any(|c| c.is_control() || c == ' ' || c == '\\' || c == '"')
}
