//! Knobs for the logging middleware.

use crate::fields;
use crate::level::Level;
use crate::record::Field;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tonic::{Code, Status};

/// Maps the final gRPC code of a call to the level of its completion line.
pub type CodeToLevel = fn(Code) -> Level;

/// Turns the call duration into the fields attached to the completion line.
pub type DurationToFields = fn(Duration) -> Vec<Field>;

/// Decides whether a call is logged, given its full method name
/// (`/pkg.Service/Method`) and the error it ended with, if any.
pub type Decider = Arc<dyn Fn(&str, Option<&Status>) -> bool + Send + Sync>;

/// Default server-side mapping from gRPC code to level.
///
/// Client mistakes and success log at INFO, conditions worth a look at
/// WARN, and server faults at ERROR.
pub fn default_code_to_level(code: Code) -> Level {
    match code {
        Code::Ok
        | Code::Cancelled
        | Code::InvalidArgument
        | Code::NotFound
        | Code::AlreadyExists
        | Code::Unauthenticated => Level::Info,

        Code::DeadlineExceeded
        | Code::PermissionDenied
        | Code::ResourceExhausted
        | Code::FailedPrecondition
        | Code::Aborted
        | Code::OutOfRange
        | Code::Unavailable => Level::Warn,

        Code::Unknown | Code::Unimplemented | Code::Internal | Code::DataLoss => Level::Error,
    }
}

/// `grpc.time_ms` as fractional milliseconds.
pub fn default_duration_to_fields(duration: Duration) -> Vec<Field> {
    fields!["grpc.time_ms" => duration.as_nanos() as f64 / 1_000_000.0]
}

fn log_everything(_method: &str, _err: Option<&Status>) -> bool {
    true
}

/// Options shared by the logging middleware.
///
/// ```
/// use interceptor_log_kit::options::Options;
///
/// let opts = Options::default()
///     .with_decider(|method, err| err.is_some() || method != "/grpc.health.v1.Health/Check");
/// assert!(!opts.should_log("/grpc.health.v1.Health/Check", None));
/// ```
#[derive(Clone)]
pub struct Options {
    pub code_to_level: CodeToLevel,
    pub duration_to_fields: DurationToFields,
    pub decider: Decider,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            code_to_level: default_code_to_level,
            duration_to_fields: default_duration_to_fields,
            decider: Arc::new(log_everything),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options").finish_non_exhaustive()
    }
}

impl Options {
    /// Replace the code-to-level mapping.
    pub fn with_levels(mut self, f: CodeToLevel) -> Self {
        self.code_to_level = f;
        self
    }

    /// Replace the fields derived from the call duration.
    pub fn with_duration_field(mut self, f: DurationToFields) -> Self {
        self.duration_to_fields = f;
        self
    }

    /// Replace the decider. Calls it rejects produce no lines at all.
    pub fn with_decider<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Option<&Status>) -> bool + Send + Sync + 'static,
    {
        self.decider = Arc::new(f);
        self
    }

    pub fn should_log(&self, method: &str, err: Option<&Status>) -> bool {
        (self.decider)(method, err)
    }

    pub fn level_for(&self, code: Code) -> Level {
        (self.code_to_level)(code)
    }

    pub fn duration_fields(&self, duration: Duration) -> Vec<Field> {
        (self.duration_to_fields)(duration)
    }
}
