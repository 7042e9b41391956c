//! Logging infrastructure for the appconf library.
//!
//! The library itself only talks to the [`log`] facade. This module provides
//! the stderr backend used by the CLI, with three verbosity modes.

use std::env;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record};

use crate::error::{Error, Result};

/// Environment variable selecting the log mode when no CLI flag is given.
pub const ENV_LOG_MODE: &str = "APPCONF_LOG_MODE";

/// How much of the resolution process is reported on stderr.
///
/// Modes order from terse to chatty, so `Quiet < Normal < Verbose`.
///
/// # Examples
///
/// ```
/// use appconf::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Verbose);
/// assert_eq!("Verbose".parse::<LogLevel>().ok(), Some(LogLevel::Verbose));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Only errors.
    Quiet,
    /// Errors and warnings, such as deprecated legacy settings.
    Normal,
    /// Everything, down to per-document resolution traces.
    Verbose,
}

impl LogLevel {
    const ALL: [Self; 3] = [Self::Quiet, Self::Normal, Self::Verbose];

    /// The name accepted in `APPCONF_LOG_MODE`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
        }
    }

    /// The most verbose `log` level shown in this mode.
    #[must_use]
    pub const fn filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Error,
            Self::Normal => LevelFilter::Warn,
            Self::Verbose => LevelFilter::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    /// Case-insensitive match against [`LogLevel::name`].
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Validation {
                field: ENV_LOG_MODE.to_string(),
                message: format!("unknown log mode '{s}', expected quiet, normal or verbose"),
            })
    }
}

/// A stderr backend for the [`log`] facade.
///
/// # Examples
///
/// ```
/// use appconf::{LogLevel, Logger};
///
/// assert_eq!(Logger::default().level(), LogLevel::Normal);
/// ```
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// A logger filtering by `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// The mode this logger filters by.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Installs this logger as the global `log` backend.
    ///
    /// Only the first call in a process takes effect; later calls just
    /// adjust the maximum level.
    pub fn install(self) {
        let filter = self.level.filter();
        // A logger is already set in tests and when embedding.
        let _ = log::set_logger(Box::leak(Box::new(self)));
        log::set_max_level(filter);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level.filter()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Picks the log mode for a run.
///
/// `--verbose` beats `--quiet`, either flag beats `APPCONF_LOG_MODE`, and an
/// unset or unrecognized variable means [`LogLevel::Normal`].
///
/// # Examples
///
/// ```
/// use appconf::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, true).level(), LogLevel::Verbose);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    let level = match (verbose, quiet) {
        (true, _) => LogLevel::Verbose,
        (false, true) => LogLevel::Quiet,
        (false, false) => env::var(ENV_LOG_MODE)
            .ok()
            .and_then(|mode| mode.parse().ok())
            .unwrap_or(LogLevel::Normal),
    };
    Logger::new(level)
}
