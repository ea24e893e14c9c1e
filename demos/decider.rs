//! Log every call except successful calls to the health check method.

use interceptor_log_kit::interceptor::LoggingLayer;
use interceptor_log_kit::nop::NopLogger;
use interceptor_log_kit::options::Options;
use interceptor_log_kit::interceptor_logger;

fn main() {
    let logger = interceptor_logger(NopLogger);
    let opts = Options::default().with_decider(|full_method, err| {
        // health checks that went fine are not worth a line
        !(err.is_none() && full_method == "/blah.foo.healthcheck/Check")
    });

    let _server = tonic::transport::Server::builder().layer(LoggingLayer::with_options(logger, opts));
}
