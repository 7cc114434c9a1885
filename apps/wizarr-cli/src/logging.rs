//! Diagnostic logging setup.
//!
//! Logs always go to stderr so they never mix with the report on stdout.
//! `WIZARR_LOG`, then `RUST_LOG`, override the level chosen by flags.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive
pub const LOG_ENV: &str = "WIZARR_LOG";

/// Verbosity of diagnostic logs
///
/// Levels are ordered: Quiet < Normal < Debug < Trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Errors only
    Quiet = 0,
    /// Warnings and errors (default)
    #[default]
    Normal = 1,
    /// HTTP calls and retry decisions
    Debug = 2,
    /// Everything, including dependency internals
    Trace = 3,
}

impl LogLevel {
    /// Create LogLevel from CLI flags
    ///
    /// Order of precedence: trace > debug > quiet > normal
    pub fn from_flags(quiet: bool, debug: bool, trace: bool) -> Self {
        if trace {
            Self::Trace
        } else if debug {
            Self::Debug
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Filter directive used when no environment override is present
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Debug => "warn,wizarr_client=debug,wizarr_cli=debug",
            Self::Trace => "trace",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Quiet => "QUIET",
            Self::Normal => "NORMAL",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pick the filter: `WIZARR_LOG`, then `RUST_LOG`, then the flag level.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level.directive()))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(level >= LogLevel::Debug)
        .try_init();
}
