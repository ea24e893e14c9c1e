pub mod error;
pub mod level;
pub mod record;
pub mod logger;
pub mod logging;
pub mod adapter;
pub mod method;

pub mod nop;
pub mod writer;
pub mod tracing_logger;

pub mod backend;
pub mod env;
pub mod init;

#[cfg(feature = "grpc")]
pub mod options;
#[cfg(feature = "grpc")]
pub mod interceptor;

pub mod payload;

pub use adapter::{interceptor_logger, InterceptorLogger};
pub use level::Level;
pub use logger::KvLogger;
pub use logging::Logger;
pub use record::{Field, LogRecord};
