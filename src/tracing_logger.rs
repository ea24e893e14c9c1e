use crate::error::Result;
use crate::level::Level;
use crate::logger::KvLogger;
use crate::record::Field;
use crate::writer::logfmt;

/// Forwards key/value lines to the `tracing` ecosystem.
///
/// Each call becomes one event. Its level comes from the last `level`
/// pair in the line (INFO when absent or unparsable) and the pairs are
/// rendered as logfmt in the `fields` field, so any subscriber set up
/// with [`init_tracing`](crate::init::init_tracing) prints them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

fn level_of(fields: &[Field]) -> Level {
    fields
        .iter()
        .rev()
        .find(|f| f.key == Level::KEY)
        .and_then(|f| f.value.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(Level::Info)
}

impl KvLogger for TracingLogger {
    fn log(&self, fields: &[Field]) -> Result<()> {
        let line = logfmt(fields);
        match level_of(fields) {
            Level::Debug => tracing::debug!(target: "grpc", fields = %line),
            Level::Info => tracing::info!(target: "grpc", fields = %line),
            Level::Warn => tracing::warn!(target: "grpc", fields = %line),
            Level::Error => tracing::error!(target: "grpc", fields = %line),
        }
        Ok(())
    }
}
