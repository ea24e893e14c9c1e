use crate::level::Level;
use crate::record::{Field, LogRecord};
use std::sync::Arc;

/// Leveled logging hook called by the logging middleware at each decision
/// point (call start, call completion, payload).
///
/// Structured loggers usually do not implement this directly; wrap them
/// with [`interceptor_logger`](crate::adapter::interceptor_logger).
pub trait Logger: Send + Sync {
    /// Log `fields` at `level`. Never fails from the caller's point of view.
    fn log(&self, level: Level, fields: &[Field]);

    fn debug(&self, fields: &[Field]) {
        self.log(Level::Debug, fields)
    }

    fn info(&self, fields: &[Field]) {
        self.log(Level::Info, fields)
    }

    fn warn(&self, fields: &[Field]) {
        self.log(Level::Warn, fields)
    }

    fn error(&self, fields: &[Field]) {
        self.log(Level::Error, fields)
    }

    fn log_record(&self, record: &LogRecord) {
        self.log(record.level, &record.fields)
    }
}

impl<T: Logger + ?Sized> Logger for Arc<T> {
    fn log(&self, level: Level, fields: &[Field]) {
        (**self).log(level, fields)
    }
}

impl<T: Logger + ?Sized> Logger for &T {
    fn log(&self, level: Level, fields: &[Field]) {
        (**self).log(level, fields)
    }
}
