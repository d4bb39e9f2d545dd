//! Structured logging with visual formatting.
//!
//! Every message is printed to stdout with a level prefix (`[LOG]`, `[WARN]`, ...)
//! or with Unicode box drawing characters that group the daemon's output into
//! blocks: a version header, one block per state change and a closing marker.
//!
//! Logging can be switched off at runtime for quiet one-shot commands and
//! tests. Per-tick details are only printed when debug output is enabled.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Log level enumeration for categorizing message importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,   // Normal operational logs
    Warn,  // Non-fatal issues
    Err,   // Recoverable failures
    Crit,  // Failures that stop the daemon
    Info,  // Status updates
    Debug, // Per-tick details, only with --debug
}

impl LogLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Log => "[LOG]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Err => "[ERR]",
            LogLevel::Crit => "[CRIT]",
            LogLevel::Info => "[INFO]",
            LogLevel::Debug => "[DEBUG]",
        }
    }
}

/// Main logging interface providing structured output formatting.
pub struct Log;

impl Log {
    /// Enable or disable logging.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `[DEBUG]` output.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Format a message with its level prefix, or `None` when it would be suppressed.
    pub fn format(level: LogLevel, message: &str) -> Option<String> {
        if !Self::is_enabled() {
            return None;
        }
        if level == LogLevel::Debug && !Self::is_debug() {
            return None;
        }
        Some(format!("{} {}", level.prefix(), message))
    }

    /// Main log function with level-based prefixes.
    pub fn log(level: LogLevel, message: &str) {
        if let Some(line) = Self::format(level, message) {
            println!("{}", line);
        }
    }

    // ═══ Convenience Methods for Common Log Levels ═══

    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    pub fn log_info(message: &str) {
        Self::log(LogLevel::Info, message);
    }

    pub fn log_debug(message: &str) {
        Self::log(LogLevel::Debug, message);
    }

    pub fn log_critical(message: &str) {
        Self::log(LogLevel::Crit, message);
    }

    /// Log an error followed by each of its underlying causes, indented.
    pub fn log_error_chain(level: LogLevel, error: &dyn Error) {
        Self::log(level, &error.to_string());
        let mut source = error.source();
        while let Some(cause) = source {
            Self::log_indented(&format!("caused by: {}", cause));
            source = cause.source();
        }
    }

    // ═══ Visual Formatting Functions ═══

    /// Log a decorated message with a branching indicator.
    pub fn log_decorated(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┣ {}", message);
    }

    /// Log an indented message for details under a decorated line.
    pub fn log_indented(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃   {}", message);
    }

    pub fn log_pipe() {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
    }

    /// Start a new block, used for state changes such as phase transitions.
    pub fn log_block_start(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
        println!("┣ {}", message);
    }

    /// Log the application version header.
    pub fn log_version() {
        if !Self::is_enabled() {
            return;
        }
        println!("┏ gammaflux v{} ━━╸", env!("CARGO_PKG_VERSION"));
        println!("┃");
    }

    /// Close the visual structure when the application ends.
    pub fn log_end() {
        if !Self::is_enabled() {
            return;
        }
        println!("╹");
    }
}
