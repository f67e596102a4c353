//! # Logger Service
//!
//! This crate implements structured logging for the simulator.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Components emit [`LogEntry`] values into a [`LogSink`]; the host decides
//! whether they are rendered, collected or dropped.

use core_types::{Pid, Tick};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// Log level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    #[default]
    Warn,
    /// Errors
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Source process (if any)
    pub source: Option<Pid>,
    /// Simulation tick (if known)
    pub tick: Option<Tick>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            source: None,
            tick: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the source process
    pub fn with_source(mut self, source: Pid) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the tick
    pub fn at(mut self, tick: Tick) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a field by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.level)?;
        if let Some(tick) = self.tick {
            write!(f, " tick={}", tick)?;
        }
        if let Some(pid) = self.source {
            write!(f, " pid={}", pid)?;
        }
        write!(f, " {}", self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Destination for log entries
pub trait LogSink {
    /// Records one entry
    fn log(&mut self, entry: LogEntry);

    /// Checks whether entries at `level` would be kept
    ///
    /// Callers may skip building entries that would be dropped.
    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }
}

/// Drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn log(&mut self, _entry: LogEntry) {}

    fn enabled(&self, _level: LogLevel) -> bool {
        false
    }
}

/// Collects entries in memory
///
/// Clones share the same buffer, so a test can hand one clone to the engine
/// and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSink {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything logged so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// Returns entries at or above `level`
    pub fn entries_at_least(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.level >= level)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl LogSink for MemoryLogSink {
    fn log(&mut self, entry: LogEntry) {
        self.entries.borrow_mut().push(entry);
    }
}

/// Renders entries to standard error
#[derive(Debug, Clone, Copy)]
pub struct StderrLogSink {
    min_level: LogLevel,
}

impl StderrLogSink {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Default for StderrLogSink {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl LogSink for StderrLogSink {
    fn log(&mut self, entry: LogEntry) {
        if entry.level >= self.min_level {
            let _ = writeln!(std::io::stderr().lock(), "{}", entry);
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "test message");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "test message");
        assert!(entry.source.is_none());
        assert!(entry.tick.is_none());
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_log_entry_with_source_and_tick() {
        let entry = LogEntry::new(LogLevel::Info, "test")
            .with_source(Pid::new(4))
            .at(Tick::new(9));
        assert_eq!(entry.source, Some(Pid::new(4)));
        assert_eq!(entry.tick, Some(Tick::new(9)));
    }

    #[test]
    fn test_log_entry_with_fields() {
        let entry = LogEntry::new(LogLevel::Info, "test")
            .with_field("key1", "value1")
            .with_field("key2", 2);

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.field("key1"), Some("value1"));
        assert_eq!(entry.field("key2"), Some("2"));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_log_entry_display() {
        let entry = LogEntry::new(LogLevel::Debug, "admission rejected")
            .at(Tick::new(3))
            .with_source(Pid::new(12))
            .with_field("size", 50);
        assert_eq!(
            entry.to_string(),
            "[DEBUG] tick=3 pid=12 admission rejected size=50"
        );
    }

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemoryLogSink::new();
        let mut handle = sink.clone();
        handle.log(LogEntry::new(LogLevel::Debug, "a"));
        handle.log(LogEntry::new(LogLevel::Warn, "b"));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.entries_at_least(LogLevel::Info).len(), 1);
        assert_eq!(sink.entries()[0].message, "a");
    }

    #[test]
    fn test_stderr_sink_filtering() {
        let sink = StderrLogSink::new(LogLevel::Info);
        assert!(!sink.enabled(LogLevel::Debug));
        assert!(sink.enabled(LogLevel::Error));
    }

    #[test]
    fn test_null_sink_disabled() {
        let mut sink = NullLogSink;
        assert!(!sink.enabled(LogLevel::Error));
        sink.log(LogEntry::new(LogLevel::Error, "dropped"));
    }

    #[test]
    fn test_default_level_is_warn() {
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }
}
