#![deny(missing_docs)]
//! Shared logging utilities for the mediadeck workspace.
//!
//! This crate provides the `deck_*` logging macros used across the codebase,
//! the process-wide logger initialization for the CLI, and a minimal test
//! initializer for the global logger.

use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

#[doc(hidden)]
pub use log;
pub use log::LevelFilter;

use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Number of full-refresh polls started by the running session.
static POLL_CYCLE: AtomicU64 = AtomicU64::new(0);

/// Default log file, relative to the current working directory.
pub const LOG_FILE_NAME: &str = "mediadeck.log";

/// Advances the poll cycle counter and returns the new value.
/// Called by the full-refresh loop once per poll.
pub fn next_poll_cycle() -> u64 {
    POLL_CYCLE.fetch_add(1, Ordering::Relaxed) + 1
}

/// Retrieves the current poll cycle. Returns 0 before the first poll.
pub fn poll_cycle() -> u64 {
    POLL_CYCLE.load(Ordering::Relaxed)
}

/// Logs a trace-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! deck_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("[poll {}] {}", $crate::poll_cycle(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! deck_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("[poll {}] {}", $crate::poll_cycle(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! deck_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("[poll {}] {}", $crate::poll_cycle(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! deck_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("[poll {}] {}", $crate::poll_cycle(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! deck_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("[poll {}] {}", $crate::poll_cycle(), format_args!($($arg)*));
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to `./mediadeck.log` in the current directory.
    File,
    /// Write to stderr, keeping stdout free for command output.
    Terminal,
    /// Write to both file and terminal.
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

/// Initialize the global logger.
///
/// Only records from mediadeck modules are kept. A log file that cannot be
/// created is reported on stderr and skipped. A second call is ignored.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = session_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.to_file() {
        let path = Path::new(LOG_FILE_NAME);
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("mediadeck: cannot open {}: {}", path.display(), err),
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

fn session_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .add_filter_allow_str("mediadeck")
        .build()
}

/// Terminal logger for integration tests, without timestamps.
///
/// Safe to call from every test; only the first call installs a logger.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Never);
}
