//! Run log for the conversion pipeline.
//!
//! Entries go to stderr so stdout stays free for the JSON document when
//! the output is `-`. The text format is meant for people, the json format
//! emits one serialized [`LogEntry`] per line for wrapping scripts.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Mutex;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// How entries are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

/// Render an entry as a single line, without the trailing newline.
pub fn render(entry: &LogEntry, format: LogFormat) -> String {
    match format {
        LogFormat::Text => {
            let prefix = match entry.level {
                LogLevel::Info => "   ",
                LogLevel::Success => "   ✓",
                LogLevel::Warning => "   ⚠️",
                LogLevel::Error => "   ❌",
            };
            let indent = "   ".repeat(entry.indent as usize);
            format!("{}{} {}", indent, prefix, entry.message)
        }
        LogFormat::Json => serde_json::to_string(entry)
            .unwrap_or_else(|_| format!("{{\"level\":\"error\",\"message\":{:?}}}", entry.message)),
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct LogSettings {
    format: LogFormat,
    quiet: bool,
}

/// Global logger
pub static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// Writes log entries to stderr
pub struct Logger {
    settings: Mutex<LogSettings>,
}

impl Logger {
    pub fn new() -> Self {
        Self { settings: Mutex::new(LogSettings::default()) }
    }

    /// Set the output format; `quiet` keeps only errors.
    pub fn configure(&self, format: LogFormat, quiet: bool) {
        let mut settings = self.settings.lock().unwrap_or_else(|e| e.into_inner());
        *settings = LogSettings { format, quiet };
    }

    fn settings(&self) -> LogSettings {
        *self.settings.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether `level` passes the current filter
    pub fn enabled(&self, level: LogLevel) -> bool {
        !self.settings().quiet || level == LogLevel::Error
    }

    pub fn log(&self, entry: LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }
        eprintln!("{}", render(&entry, self.settings().format));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure the global logger
pub fn init(format: LogFormat, quiet: bool) {
    LOGGER.configure(format, quiet);
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}
