use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// A user-facing message. Every notification is also logged; failures at
/// `warn` so they reach the log file without echoing on stderr.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl Notification {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        let message = message.into();
        match level {
            Level::Error | Level::Warning => tracing::warn!(level = level.as_str(), "{message}"),
            Level::Success | Level::Info => tracing::info!(level = level.as_str(), "{message}"),
        }
        Self {
            level,
            message,
            timestamp: Local::now(),
        }
    }
}
