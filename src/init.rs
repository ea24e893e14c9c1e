use crate::env::{env_or, LOG_LEVEL_ENV};
use crate::level::{Level, ParseLevelError};
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

/// Configuration of the global `tracing` subscriber used together with
/// [`TracingLogger`](crate::tracing_logger::TracingLogger).
///
/// **Fields**
/// - `max_level`: most verbose level that is printed.
/// - `with_target`: print the event target (`grpc` for interceptor lines).
/// - `stderr`: write to stderr instead of stdout.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub max_level: Level,
    pub with_target: bool,
    pub stderr: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            max_level: Level::Info,
            with_target: true,
            stderr: false,
        }
    }
}

impl TracingConfig {
    /// Defaults, with `max_level` taken from [`LOG_LEVEL_ENV`] when set.
    pub fn from_env() -> Result<Self, InitError> {
        let max_level = env_or(LOG_LEVEL_ENV, Level::Info.as_str()).parse::<Level>()?;
        Ok(Self {
            max_level,
            ..Self::default()
        })
    }
}

/// Error returned when installing the global subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("global tracing subscriber already set: {0}")]
    AlreadySet(#[from] SetGlobalDefaultError),

    #[error(transparent)]
    InvalidLevel(#[from] ParseLevelError),
}

/// Install a `fmt` subscriber as the global default.
///
/// **Effects**
///
/// Installs a [`Registry`] with a `fmt` layer filtered at
/// `config.max_level`. Fails if another global subscriber is already set.
pub fn init_tracing_with_config(config: TracingConfig) -> Result<(), InitError> {
    let filter = LevelFilter::from_level(config.max_level.into());

    // The writer changes the layer type, so each variant is assembled
    // separately.
    if config.stderr {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(config.with_target)
            .with_writer(std::io::stderr)
            .with_filter(filter);
        tracing::subscriber::set_global_default(Registry::default().with(fmt_layer))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(config.with_target)
            .with_filter(filter);
        tracing::subscriber::set_global_default(Registry::default().with(fmt_layer))?;
    }
    Ok(())
}

/// Initialize tracing with [`TracingConfig::from_env`].
///
/// This is the recommended entrypoint for services that log their
/// interceptors through [`TracingLogger`](crate::tracing_logger::TracingLogger).
pub fn init_tracing() -> Result<(), InitError> {
    init_tracing_with_config(TracingConfig::from_env()?)
}
