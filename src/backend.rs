use std::sync::Arc;

use crate::env::{env_flag, env_or, LOG_FORMAT_ENV, LOG_TIMESTAMP_ENV};
use crate::logger::KvLogger;
use crate::nop::NopLogger;
use crate::tracing_logger::TracingLogger;
use crate::writer::{JsonLogger, LogfmtLogger};

/// Built-in key/value loggers that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Discard everything.
    Nop,
    /// One JSON object per line on stderr.
    Json,
    /// One logfmt line on stderr.
    Logfmt,
    /// Forward to the global `tracing` subscriber.
    Tracing,
}

/// Logger selection built from a format name or explicit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Selected logger implementation.
    pub format: LogFormat,
    /// Prepend a timestamp to each line (writer formats only).
    pub timestamp: bool,
}

impl LoggerConfig {
    pub fn new(format: LogFormat) -> Self {
        LoggerConfig {
            format,
            timestamp: false,
        }
    }

    /// Read [`LOG_FORMAT_ENV`] (default `logfmt`) and [`LOG_TIMESTAMP_ENV`].
    pub fn from_env() -> Result<Self, FormatError> {
        let format = parse_format(&env_or(LOG_FORMAT_ENV, "logfmt"))?;
        Ok(LoggerConfig {
            format,
            timestamp: env_flag(LOG_TIMESTAMP_ENV),
        })
    }
}

/// Parse a logger format name, case-insensitively.
///
/// Accepted names:
/// - "nop" / "none"
/// - "json"
/// - "logfmt" / "text"
/// - "tracing"
pub fn parse_format(name: &str) -> Result<LogFormat, FormatError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "nop" | "none" => Ok(LogFormat::Nop),
        "json" => Ok(LogFormat::Json),
        "logfmt" | "text" => Ok(LogFormat::Logfmt),
        "tracing" => Ok(LogFormat::Tracing),
        _ => Err(FormatError::Unknown(name.to_string())),
    }
}

/// Error type returned when parsing a logger format name.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("unknown log format: {0:?}")]
    Unknown(String),
}

/// Create a concrete [`KvLogger`] from a [`LoggerConfig`].
///
/// This is the entry point for services that pick their logger from
/// configuration instead of constructing one by hand.
pub fn make_logger(cfg: &LoggerConfig) -> Arc<dyn KvLogger> {
    match (cfg.format, cfg.timestamp) {
        (LogFormat::Nop, _) => Arc::new(NopLogger),
        (LogFormat::Json, false) => Arc::new(JsonLogger::stderr()),
        (LogFormat::Json, true) => Arc::new(JsonLogger::stderr().with_timestamp()),
        (LogFormat::Logfmt, false) => Arc::new(LogfmtLogger::stderr()),
        (LogFormat::Logfmt, true) => Arc::new(LogfmtLogger::stderr().with_timestamp()),
        (LogFormat::Tracing, _) => Arc::new(TracingLogger),
    }
}

/// Shorthand for [`LoggerConfig::from_env`] followed by [`make_logger`].
pub fn logger_from_env() -> Result<Arc<dyn KvLogger>, FormatError> {
    let cfg = LoggerConfig::from_env()?;
    tracing::debug!(format = ?cfg.format, timestamp = cfg.timestamp, "building interceptor logger");
    Ok(make_logger(&cfg))
}
