//! Structured diagnostic logging
//!
//! The session reports probe failures here rather than aborting; the
//! logger writes structured entries to stderr so measurement output on
//! stdout stays clean. JSON mode produces one serialized entry per line
//! for log aggregators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug level - detailed information for debugging
    Debug = 0,
    /// Info level - general application information
    Info = 1,
    /// Warning level - potentially harmful situations
    Warn = 2,
    /// Error level - error events but the session can continue
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m", // Cyan
            LogLevel::Info => "\x1b[32m",  // Green
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Error => "\x1b[31m", // Red
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID tying entries of one session together
    pub correlation_id: String,
    /// Additional structured fields
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub fields: HashMap<String, serde_json::Value>,
}

/// Console logger with colored text and JSON output modes
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    min_level: LogLevel,
    enable_color: bool,
    json_output: bool,
    correlation_id: String,
    /// Suppresses all output; used by tests
    silent: bool,
}

impl Logger {
    /// Create a logger for the named component
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            min_level: LogLevel::Info,
            enable_color: true,
            json_output: false,
            correlation_id: Uuid::new_v4().to_string(),
            silent: false,
        }
    }

    /// Set the minimum level that will be emitted
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, enable: bool) -> Self {
        self.enable_color = enable;
        self
    }

    /// Switch to one-JSON-entry-per-line output
    pub fn with_json(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }

    /// A logger that drops everything, for use in tests
    pub fn for_tests() -> Self {
        let mut logger = Self::new("test");
        logger.silent = true;
        logger
    }

    pub fn debug<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Debug, message.into(), HashMap::new());
    }

    pub fn info<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Info, message.into(), HashMap::new());
    }

    pub fn warn<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Warn, message.into(), HashMap::new());
    }

    pub fn error<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Error, message.into(), HashMap::new());
    }

    /// Log with additional structured fields
    pub fn log_with_fields<S: Into<String>>(
        &self,
        level: LogLevel,
        message: S,
        fields: HashMap<String, serde_json::Value>,
    ) {
        self.log(level, message.into(), fields);
    }

    fn log(&self, level: LogLevel, message: String, fields: HashMap<String, serde_json::Value>) {
        if level < self.min_level || self.silent {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message,
            logger: self.name.clone(),
            correlation_id: self.correlation_id.clone(),
            fields,
        };

        eprintln!("{}", self.format_entry(&entry));
    }

    fn format_entry(&self, entry: &LogEntry) -> String {
        if self.json_output {
            return serde_json::to_string(entry)
                .unwrap_or_else(|_| format!("{} {}", entry.level.as_str(), entry.message));
        }

        let level = if self.enable_color {
            format!(
                "{}{}{}",
                entry.level.color_code(),
                entry.level.as_str(),
                LogLevel::reset_code()
            )
        } else {
            entry.level.as_str().to_string()
        };

        let mut line = format!(
            "{} [{}] {}: {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            level,
            entry.logger,
            entry.message
        );

        if !entry.fields.is_empty() {
            let mut keys: Vec<&String> = entry.fields.keys().collect();
            keys.sort();
            for key in keys {
                line.push_str(&format!(" {}={}", key, entry.fields[key]));
            }
        }

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_plain_format_contains_logger_and_message() {
        let logger = Logger::new("session").with_color(false);
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Error,
            message: "Download probe failed in cycle 3".to_string(),
            logger: "session".to_string(),
            correlation_id: "abc".to_string(),
            fields: HashMap::new(),
        };

        let line = logger.format_entry(&entry);
        assert!(line.contains("[ERROR]"));
        assert!(line.contains("session:"));
        assert!(line.contains("Download probe failed in cycle 3"));
    }

    #[test]
    fn test_json_format_round_trips() {
        let logger = Logger::new("session").with_json(true);
        let mut fields = HashMap::new();
        fields.insert("cycle".to_string(), serde_json::json!(3));

        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Warn,
            message: "slow cycle".to_string(),
            logger: "session".to_string(),
            correlation_id: "abc".to_string(),
            fields,
        };

        let line = logger.format_entry(&entry);
        let back: LogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.level, LogLevel::Warn);
        assert_eq!(back.fields["cycle"], serde_json::json!(3));
    }

    #[test]
    fn test_loggers_get_distinct_correlation_ids() {
        let a = Logger::new("a");
        let b = Logger::new("b");
        assert_ne!(a.correlation_id, b.correlation_id);
    }
}
