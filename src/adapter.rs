use crate::level::Level;
use crate::logger::KvLogger;
use crate::logging::Logger;
use crate::record::{leveled, Field};
use std::sync::Arc;

/// Adapter that lets any [`KvLogger`] serve as the [`Logger`] of the
/// logging interceptors.
///
/// Every leveled call is turned into exactly one call of the wrapped
/// logger with the caller's fields followed by `("level", <level>)`.
/// Errors returned by the wrapped logger are dropped here; reporting
/// them is the wrapped logger's business.
///
/// The adapter holds only shared, immutable handles, so clones are cheap
/// and it can be used from any number of request tasks at once.
pub struct InterceptorLogger<L: ?Sized> {
    context: Arc<[Field]>,
    logger: Arc<L>,
}

/// Wrap `logger` so it can be handed to the logging interceptors.
pub fn interceptor_logger<L: KvLogger>(logger: L) -> InterceptorLogger<L> {
    InterceptorLogger::new(Arc::new(logger))
}

impl<L: KvLogger + ?Sized> InterceptorLogger<L> {
    pub fn new(logger: Arc<L>) -> Self {
        InterceptorLogger {
            context: Arc::from(Vec::<Field>::new()),
            logger,
        }
    }

    /// Return an adapter that prefixes every line with `fields`, after
    /// any context already bound.
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        let context: Vec<Field> = self.context.iter().cloned().chain(fields).collect();
        InterceptorLogger {
            context: Arc::from(context),
            logger: Arc::clone(&self.logger),
        }
    }

    /// The wrapped logger.
    pub fn inner(&self) -> &Arc<L> {
        &self.logger
    }
}

impl<L: ?Sized> Clone for InterceptorLogger<L> {
    fn clone(&self) -> Self {
        InterceptorLogger {
            context: Arc::clone(&self.context),
            logger: Arc::clone(&self.logger),
        }
    }
}

impl<L: KvLogger + ?Sized> Logger for InterceptorLogger<L> {
    fn log(&self, level: Level, fields: &[Field]) {
        let _ = KvLogger::log(&*self.logger, &leveled(level, &self.context, fields));
    }
}
