use crate::error::Result;
use crate::record::Field;
use std::sync::Arc;

/// A structured logger that emits one line per flat key/value sequence.
///
/// This is the only capability the interceptor adapter needs from the
/// logger it wraps: there is no notion of level here, the level travels
/// as an ordinary `("level", ..)` pair.
///
/// Implementations must be safe to call from many request tasks at once.
pub trait KvLogger: Send + Sync {
    /// Emit a single log line made of `fields`, in order.
    ///
    /// **Returns**
    /// - `Ok(())` if the line was written (or deliberately discarded).
    /// - `Err(..)` if encoding or the underlying writer failed.
    fn log(&self, fields: &[Field]) -> Result<()>;
}

impl<T: KvLogger + ?Sized> KvLogger for Arc<T> {
    fn log(&self, fields: &[Field]) -> Result<()> {
        (**self).log(fields)
    }
}

impl<T: KvLogger + ?Sized> KvLogger for Box<T> {
    fn log(&self, fields: &[Field]) -> Result<()> {
        (**self).log(fields)
    }
}

impl<T: KvLogger + ?Sized> KvLogger for &T {
    fn log(&self, fields: &[Field]) -> Result<()> {
        (**self).log(fields)
    }
}
