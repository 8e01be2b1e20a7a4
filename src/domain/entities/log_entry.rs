use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a synthetic event-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One line of the dashboard event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    /// Wall-clock label, `HH:MM:SS` in local time.
    pub time: String,
    pub text: String,
    pub level: LogLevel,
}

impl LogEntry {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, text: impl Into<String>, level: LogLevel) -> Self {
        Self {
            timestamp,
            time: timestamp.with_timezone(&Local).format("%H:%M:%S").to_string(),
            text: text.into(),
            level,
        }
    }
}
