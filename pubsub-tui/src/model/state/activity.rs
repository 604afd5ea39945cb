//! Activity log

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Entries kept before the oldest is dropped.
pub const MAX_LOG_ENTRIES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Network,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "OK",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Network => "NET",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub time: DateTime<Local>,
}

impl LogEntry {
    /// `HH:MM:SS`
    pub fn timestamp(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }
}

/// User-facing log. Every entry is also written to the file log.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Error => log::error!("{message}"),
            LogLevel::Warning => log::warn!("{message}"),
            LogLevel::Info | LogLevel::Success | LogLevel::Network => log::info!("{message}"),
        }
        self.entries.push_back(LogEntry {
            level,
            message,
            time: Local::now(),
        });
        if self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    pub fn network(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Network, message);
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// True if any entry's message equals `message`.
    pub fn contains(&self, message: &str) -> bool {
        self.entries.iter().any(|e| e.message == message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_at_limit() {
        let mut log = ActivityLog::new();
        for i in 0..=MAX_LOG_ENTRIES {
            log.info(format!("entry {i}"));
        }
        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        assert!(!log.contains("entry 0"));
        assert_eq!(
            log.last().map(|e| e.message.as_str()),
            Some(format!("entry {MAX_LOG_ENTRIES}").as_str())
        );
    }

    #[test]
    fn timestamp_format() {
        let mut log = ActivityLog::new();
        log.success("done");
        let ts = log.last().map(LogEntry::timestamp).unwrap();
        assert_eq!(ts.len(), 8);
        assert_eq!(ts.matches(':').count(), 2);
    }
}
