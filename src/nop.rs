use crate::error::Result;
use crate::logger::KvLogger;
use crate::record::Field;

/// A logger that simply drops every line.
///
/// Handy for wiring middleware in examples and for measuring the cost of
/// the interceptor path without any I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopLogger;

impl KvLogger for NopLogger {
    fn log(&self, _fields: &[Field]) -> Result<()> {
        Ok(())
    }
}
