//! Logging configuration for CampusQL
//!
//! Structured logging through `tracing`, to stdout, a daily-rolled file,
//! or both. `RUST_LOG` takes precedence over the configured level.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "campusql.log";

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a file with daily rotation
    File(PathBuf),
    /// Output to both stdout and file
    Both(PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// Single-line output
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `campusql_core=trace`
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    /// Info level to stdout
    pub fn info() -> Self {
        Self::default()
    }

    /// Debug level, shows per-stage row counts
    pub fn debug() -> Self {
        Self::default().with_level("debug")
    }

    /// Trace level, shows every aggregate
    pub fn trace() -> Self {
        Self::default().with_level("trace")
    }

    /// Set log output to file with rotation
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log output to both stdout and file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned guard alive while logging to a file; dropping it
    /// flushes and stops the writer thread. An unparsable level falls back
    /// to `info`. Does nothing if a subscriber is already installed.
    ///
    /// ```rust,no_run
    /// use campusql::logging::LogConfig;
    ///
    /// let _guard = LogConfig::debug().with_file("logs/campusql.log").init();
    /// ```
    pub fn init(self) -> Option<WorkerGuard> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(env_filter);

        match self.output {
            LogOutput::Stdout => {
                let _ = match self.format {
                    LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
                    LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
                };
                None
            }
            LogOutput::File(path) => {
                let (writer, guard) = rolling_writer(&path);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                let _ = match self.format {
                    LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
                    LogFormat::Compact => registry.with(layer.compact()).try_init(),
                };
                Some(guard)
            }
            LogOutput::Both(path) => {
                let (writer, guard) = rolling_writer(&path);
                let _ = registry
                    .with(fmt::layer().compact())
                    .with(fmt::layer().with_writer(writer).with_ansi(false).compact())
                    .try_init();
                Some(guard)
            }
        }
    }
}

fn rolling_writer(path: &Path) -> (NonBlocking, WorkerGuard) {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);
    tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name))
}
