//! # Logging Setup
//!
//! Structured logging for the Holdfast workspace, built on `tracing`.
//!
//! Holdfast is a library that gets loaded into somebody else's process, so
//! the setup here differs from a normal application in two ways: everything
//! goes to **stderr** (stdout belongs to the host program), and
//! initialization is strictly best-effort - if the host already installed a
//! global subscriber, [`init_logging`] reports that instead of panicking and
//! Holdfast's events flow into the host's subscriber.
//!
//! ## Environment Variables
//!
//! - `HOLDFAST_LOG`: level filter, full `tracing` filter syntax
//!   (e.g. `debug`, `holdfast_core=trace`)
//! - `HOLDFAST_LOG_FORMAT`: `pretty` (default) or `json`
//! - `HOLDFAST_LOG_FILE`: optional path; adds a daily-rolling file output
//!   next to the console one
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use holdfast_utils::init_logging;
//!
//! // Best-effort: Err means a subscriber already exists, which is fine.
//! let _ = init_logging();
//! tracing::info!("diagnostics online");
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use tracing::Level;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    Pretty,
    /// JSON, one event per line
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Initialize logging from the `HOLDFAST_LOG*` environment variables.
///
/// Safe to call from a load-time constructor: it allocates but takes no
/// locks that a host program could already hold.
///
/// ## Errors
///
/// [`LoggingError::AlreadyInitialized`] when a global subscriber exists
/// (typically the host program's); Holdfast's events then go there. File
/// output problems surface as [`LoggingError::FileError`].
pub fn init_logging() -> Result<(), LoggingError>
{
    let format = env::var("HOLDFAST_LOG_FORMAT")
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or(LogFormat::Pretty);

    let default_level = env::var("HOLDFAST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse::<LogLevel>()
        .map(Into::into)
        .unwrap_or(Level::INFO);

    init_logging_internal(format, default_level)
}

/// Initialize logging with an explicit level and format, bypassing the
/// environment for everything except the optional `HOLDFAST_LOG_FILE`.
///
/// ## Errors
///
/// Same contract as [`init_logging`].
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_logging_internal(format, level.into())
}

fn init_logging_internal(format: LogFormat, default_level: Level) -> Result<(), LoggingError>
{
    // HOLDFAST_LOG may carry per-module filters; a bare default level
    // otherwise.
    let env_filter = env::var("HOLDFAST_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(&spec).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level.to_string()));

    let console_layer = event_layer(format, io::stderr, true).with_filter(env_filter);

    let registry = Registry::default().with(console_layer);
    match env::var("HOLDFAST_LOG_FILE").ok().map(PathBuf::from) {
        Some(path) => {
            let writer = file_writer(&path);
            // File output mirrors the console filter rather than sharing it;
            // EnvFilter is not cloneable across layers with different writers.
            let file_filter = env::var("HOLDFAST_LOG")
                .ok()
                .and_then(|spec| EnvFilter::try_new(&spec).ok())
                .unwrap_or_else(|| EnvFilter::new(default_level.to_string()));
            let file_layer = event_layer(format, writer, false).with_filter(file_filter);
            registry
                .with(file_layer)
                .try_init()
                .map_err(|_| LoggingError::AlreadyInitialized)
        }
        None => registry.try_init().map_err(|_| LoggingError::AlreadyInitialized),
    }
}

/// One formatted event layer; shared assembly for console and file output.
fn event_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(ansi)
        .with_writer(writer);

    match format {
        LogFormat::Pretty => base.boxed(),
        LogFormat::Json => base.json().with_current_span(true).with_span_list(true).boxed(),
    }
}

/// Daily-rolling non-blocking file writer.
///
/// The flush guard is leaked: this library has no shutdown point to hand it
/// back to, and the process exit path flushes via the OS anyway.
fn file_writer(path: &Path) -> tracing_appender::non_blocking::NonBlocking
{
    let dir = path.parent().unwrap_or(Path::new("."));
    let name = path.file_name().unwrap_or_default();
    let appender = tracing_appender::rolling::daily(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    std::mem::forget(guard);
    non_blocking
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("invalid log format: {0} (use 'pretty' or 'json')")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("invalid log level: {0} (use 'error', 'warn', 'info', 'debug' or 'trace')")]
    InvalidLevel(String),

    /// A global subscriber is already installed
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    /// File logging error
    #[error("file logging error: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("prod").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warn").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("debug").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_second_initialization_is_reported()
    {
        // Whichever test initializes first wins; the second call must fail
        // cleanly rather than panic.
        let first = init_logging_with_level(LogLevel::Info, LogFormat::Pretty);
        let second = init_logging_with_level(LogLevel::Info, LogFormat::Pretty);
        assert!(first.is_ok() || matches!(first, Err(LoggingError::AlreadyInitialized)));
        assert!(matches!(second, Err(LoggingError::AlreadyInitialized)));
    }
}
