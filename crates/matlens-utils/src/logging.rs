//! # Logging Utilities
//!
//! Logging for matlens using `tracing`.
//!
//! Rendered values go to stdout, so every log layer here writes to stderr or
//! to a file, never to stdout.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use matlens_utils::init_logging;
//!
//! // Reads RUST_LOG, MATLENS_LOG_FORMAT and MATLENS_LOG_FILE
//! init_logging().expect("Failed to initialize logging");
//! tracing::info!("Printers ready");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Level or filter (e.g. `debug`, `matlens_core::walker=trace`)
//! - `MATLENS_LOG_FORMAT`: `pretty` (default) or `json`
//! - `MATLENS_LOG_FILE`: Also write logs to this file (rolled daily)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use std::{env, io};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format
pub const FORMAT_ENV: &str = "MATLENS_LOG_FORMAT";
/// Environment variable naming an additional log file
pub const FILE_ENV: &str = "MATLENS_LOG_FILE";

// Keeps the file writer's worker thread alive for the life of the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
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
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level (default; unreadable elements show up here)
    #[default]
    Warn,
    /// Info level
    Info,
    /// Debug level (pattern fall-through)
    Debug,
    /// Trace level (every rendered cell)
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

/// Initialize logging from the environment
///
/// `RUST_LOG` wins over the default `warn` level. An unparsable
/// `MATLENS_LOG_FORMAT` is an error rather than a silent fallback.
///
/// ## Errors
///
/// Returns an error if logging is already initialized, the format variable
/// is invalid, or the log file cannot be opened.
pub fn init_logging() -> Result<(), LoggingError>
{
    init_logging_with_options(None, None)
}

/// Initialize logging with an explicit level and format
///
/// `MATLENS_LOG_FILE` is still honored.
///
/// ## Example
///
/// ```rust,no_run
/// use matlens_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// init_logging_with_level(LogLevel::Debug, LogFormat::Pretty).expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if logging is already initialized or the log file cannot
/// be opened.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_logging_with_options(Some(level), Some(format))
}

/// Initialize logging, filling in whatever is `None` from the environment
///
/// A missing `level` falls back to `RUST_LOG` (then `warn`); a missing
/// `format` falls back to `MATLENS_LOG_FORMAT` (then pretty).
///
/// ## Errors
///
/// As [`init_logging`].
pub fn init_logging_with_options(level: Option<LogLevel>, format: Option<LogFormat>) -> Result<(), LoggingError>
{
    let format = resolve_format(format)?;
    let filter = match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::from(LogLevel::default()).to_string())),
    };
    let log_file = env::var(FILE_ENV).ok().map(PathBuf::from);
    install(format, filter, log_file.as_deref())
}

/// The format to log in: `explicit` if given, else `MATLENS_LOG_FORMAT`, else
/// the default
///
/// ## Errors
///
/// `InvalidFormat` if the environment variable is consulted and unparsable.
pub fn resolve_format(explicit: Option<LogFormat>) -> Result<LogFormat, LoggingError>
{
    if let Some(format) = explicit {
        return Ok(format);
    }
    match env::var(FORMAT_ENV) {
        Ok(value) => value.parse(),
        Err(_) => Ok(LogFormat::default()),
    }
}

fn install(format: LogFormat, filter: EnvFilter, log_file: Option<&Path>) -> Result<(), LoggingError>
{
    let mut layers: Vec<BoxedLayer> = vec![console_layer(format)];
    if let Some(path) = log_file {
        layers.push(file_layer(format, path)?);
    }

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))
}

fn console_layer(format: LogFormat) -> BoxedLayer
{
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339());
    match format {
        LogFormat::Pretty => layer.with_ansi(true).boxed(),
        LogFormat::Json => layer.json().with_current_span(true).with_span_list(true).boxed(),
    }
}

fn file_layer(format: LogFormat, path: &Path) -> Result<BoxedLayer, LoggingError>
{
    let directory = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidFile(path.display().to_string()))?;
    std::fs::create_dir_all(directory)?;

    let appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    if FILE_GUARD.set(guard).is_err() {
        return Err(LoggingError::InitializationFailed("file logging already initialized".to_string()));
    }

    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false);
    Ok(match format {
        LogFormat::Pretty => layer.boxed(),
        LogFormat::Json => layer.json().with_current_span(true).with_span_list(true).boxed(),
    })
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// Log file path has no file name
    #[error("Invalid log file path: {0}")]
    InvalidFile(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
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
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("prod").unwrap(), LogFormat::Json);
        assert!(matches!(LogFormat::from_str("xml"), Err(LoggingError::InvalidFormat(s)) if s == "xml"));
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("TRACE").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_defaults()
    {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
        assert_eq!(Level::from(LogLevel::default()), Level::WARN);
    }

    #[test]
    fn test_explicit_format_wins()
    {
        assert_eq!(resolve_format(Some(LogFormat::Json)).unwrap(), LogFormat::Json);
        assert_eq!(resolve_format(Some(LogFormat::Pretty)).unwrap(), LogFormat::Pretty);
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
}
