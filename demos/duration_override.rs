//! Replacing the default `grpc.time_ms` field with a custom duration field.

use std::time::Duration;

use interceptor_log_kit::interceptor::LoggingLayer;
use interceptor_log_kit::nop::NopLogger;
use interceptor_log_kit::options::Options;
use interceptor_log_kit::{fields, interceptor_logger, Field};

fn duration_to_micros(duration: Duration) -> Vec<Field> {
    fields!["grpc.duration_us" => duration.as_micros() as u64]
}

fn main() {
    let logger = interceptor_logger(NopLogger);
    let opts = Options::default().with_duration_field(duration_to_micros);

    let _server = tonic::transport::Server::builder().layer(LoggingLayer::with_options(logger, opts));
}
