//! Structured logging for the web vitals auditor
//!
//! Lightweight structured logger with correlation IDs so one audit run's
//! fetch/analysis/render phases can be traced together, and optional JSON
//! output for log aggregators in CI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
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
    /// Error level - error events but application can continue
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
}

/// A single structured log record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Ties all entries of one audit run together
    pub correlation_id: Uuid,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, String>,
}

/// Structured logger bound to one audit run
pub struct StructuredLogger {
    min_level: LogLevel,
    json_format: bool,
    correlation_id: Uuid,
}

impl StructuredLogger {
    /// Create a logger with a fresh correlation ID
    pub fn new(min_level: LogLevel, json_format: bool) -> Self {
        Self {
            min_level,
            json_format,
            correlation_id: Uuid::new_v4(),
        }
    }

    /// Logger configured from debug/verbose flags
    pub fn from_flags(debug: bool, json_output: bool) -> Self {
        let min_level = if debug { LogLevel::Debug } else { LogLevel::Warn };
        Self::new(min_level, json_output)
    }

    /// Correlation ID of this run
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Log a message with context fields
    pub fn log_with_context(&self, level: LogLevel, message: &str, context: HashMap<String, String>) {
        if level < self.min_level {
            return;
        }
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            correlation_id: self.correlation_id,
            context,
        };
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", self.format_entry(&entry));
    }

    /// Log a plain message
    pub fn log(&self, level: LogLevel, message: &str) {
        self.log_with_context(level, message, HashMap::new());
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn format_entry(&self, entry: &LogEntry) -> String {
        if self.json_format {
            serde_json::to_string(entry).unwrap_or_else(|_| entry.message.clone())
        } else {
            let context = if entry.context.is_empty() {
                String::new()
            } else {
                let mut pairs: Vec<String> =
                    entry.context.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                pairs.sort();
                format!(" [{}]", pairs.join(", "))
            };
            format!(
                "{} {} {}{}",
                entry.timestamp.format("%H:%M:%S%.3f"),
                entry.level.as_str(),
                entry.message,
                context
            )
        }
    }
}

/// Convenience macro-free context builder
pub fn context(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
