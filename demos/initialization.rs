//! A relatively complex initialization: a logger with pre-bound fields and
//! a custom gRPC code to level mapping.

use interceptor_log_kit::backend::{make_logger, LogFormat, LoggerConfig};
use interceptor_log_kit::interceptor::LoggingLayer;
use interceptor_log_kit::options::{default_code_to_level, Options};
use interceptor_log_kit::{fields, InterceptorLogger, Level};
use tonic::Code;

/// Treat client cancellations as noise and everything else as usual.
fn custom_code_to_level(code: Code) -> Level {
    match code {
        Code::Cancelled => Level::Debug,
        other => default_code_to_level(other),
    }
}

fn main() {
    // Logger is used, allowing pre-definition of certain fields by the user.
    let kv = make_logger(&LoggerConfig::new(LogFormat::Logfmt));
    let logger = InterceptorLogger::new(kv).with(fields!["service" => "users"]);

    let opts = Options::default().with_levels(custom_code_to_level);

    let _server = tonic::transport::Server::builder().layer(LoggingLayer::with_options(logger, opts));
}
