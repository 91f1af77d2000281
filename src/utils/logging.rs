//! Logging Module
//!
//! Installs a `tracing` subscriber for the `mnista` CLI. The level comes from
//! `--log-level`, then `--verbose`, then the info default. `RUST_LOG`, when
//! set, replaces all of them.

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::utils::error::{MnistaError, Result};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum level for this crate and the CLI
    pub level: LogLevel,
    /// Whether to include target (module path)
    pub include_target: bool,
    /// Whether to include thread IDs
    pub include_thread_ids: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            include_target: false,
            include_thread_ids: false,
            ansi_colors: true,
        }
    }
}

impl LogConfig {
    /// Debug level with targets and thread ids, so loader workers can be told apart
    pub fn verbose() -> Self {
        Self {
            level: LogLevel::Debug,
            include_target: true,
            include_thread_ids: true,
            ..Self::default()
        }
    }

    /// Config for the CLI flags. An explicit level wins over `--verbose`,
    /// but keeps the verbose layout.
    pub fn from_cli(verbose: bool, level: Option<LogLevel>) -> Self {
        let base = if verbose {
            Self::verbose()
        } else {
            Self::default()
        };

        match level {
            Some(level) => Self { level, ..base },
            None => base,
        }
    }

    /// Filter directives: our crates at the configured level, burn and other
    /// dependencies at warn unless the level is stricter
    pub fn directives(&self) -> String {
        let deps = self.level.max(LogLevel::Warn);
        format!("warn,mnista={0},mnista_data={0},burn={1}", self.level, deps).to_lowercase()
    }
}

/// Log level, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[value(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.to_tracing_level(), f)
    }
}

/// Initialize logging with the given configuration
///
/// Fails if a global subscriber is already installed or `RUST_LOG` does not
/// parse.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(directives),
        Err(_) => EnvFilter::try_new(config.directives()),
    }
    .map_err(|e| MnistaError::Config(format!("Invalid log filter: {e}")))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_thread_ids(config.include_thread_ids)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| MnistaError::Config(format!("Failed to initialize logging: {e}")))
}
