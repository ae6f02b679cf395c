//! Internal logging system for the Rastex engine
//!
//! This module provides a small logging layer with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - File and line information for detailed ERROR logs

use colored::*;
use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use chrono::{DateTime, Local};
use crate::error::Result;

/// Logger trait for custom logging implementations
///
/// Implement this trait to redirect engine logs. `FileLogger` ships for plain-text files.
///
/// # Example
///
/// ```no_run
/// use rastex_engine::rastex::log::{Logger, LogEntry};
///
/// struct CountingLogger {
///     count: std::sync::atomic::AtomicUsize,
/// }
///
/// impl Logger for CountingLogger {
///     fn log(&self, _entry: &LogEntry) {
///         self.count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "rastex::raster", "rastex::vulkan")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose debug information
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (with file:line details)
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the default logger
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry without colors (used for plain-text sinks and tests)
    pub fn format_plain(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

        match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, entry.severity.label(), entry.source, entry.message, file, line
            ),
            _ => format!(
                "[{}] [{}] [{}] {}",
                timestamp, entry.severity.label(), entry.source, entry.message
            ),
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => entry.severity.label().bright_black(),
            LogSeverity::Debug => entry.severity.label().cyan(),
            LogSeverity::Info => entry.severity.label().green(),
            LogSeverity::Warn => entry.severity.label().yellow(),
            LogSeverity::Error => entry.severity.label().red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

/// Plain-text logger writing one line per entry to a file
///
/// The file is truncated on creation and starts with a header line carrying
/// the local start time. Lines use the `DefaultLogger::format_plain` layout.
pub struct FileLogger {
    writer: Mutex<LineWriter<File>>,
}

impl FileLogger {
    /// Create (or truncate) `path` and write the header line
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let mut writer = LineWriter::new(File::create(path.as_ref())?);
        let started: DateTime<Local> = Local::now();
        writeln!(writer, "Rastex log, started {}", started.format("%Y-%m-%d %H:%M:%S"))?;
        Ok(Self { writer: Mutex::new(writer) })
    }
}

impl Logger for FileLogger {
    fn log(&self, entry: &LogEntry) {
        // A failed write has nowhere to be reported; the entry is dropped.
        if let Ok(mut writer) = self.writer.lock() {
            writeln!(writer, "{}", DefaultLogger::format_plain(entry)).ok();
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically disabled)
///
/// # Example
///
/// ```no_run
/// # use rastex_engine::engine_trace;
/// engine_trace!("rastex::texture", "Binding texture {}", 3);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::rastex::Engine::log(
            $crate::rastex::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::rastex::Engine::log(
            $crate::rastex::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::rastex::Engine::log(
            $crate::rastex::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::rastex::Engine::log(
            $crate::rastex::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```no_run
/// # use rastex_engine::engine_error;
/// engine_error!("rastex::vulkan", "Failed to create image: {}", "ERROR_OUT_OF_DEVICE_MEMORY");
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::rastex::Engine::log_detailed(
            $crate::rastex::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR message and build the matching `Error::GpuResource`
///
/// Intended for `map_err` / `ok_or_else` on device calls.
///
/// ```no_run
/// # use rastex_engine::engine_err;
/// # fn f() -> rastex_engine::rastex::Result<()> {
/// let _id: u32 = None.ok_or_else(|| engine_err!("rastex::mock", "No texture bound"))?;
/// # Ok(()) }
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::rastex::Engine::log_detailed(
            $crate::rastex::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::rastex::Error::GpuResource(message)
    }};
}

/// Log an ERROR message and return `Err(Error::GpuResource)` from the current function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
