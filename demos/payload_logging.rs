//! Logging request and response payloads of the health check method only.

use interceptor_log_kit::interceptor::LoggingLayer;
use interceptor_log_kit::payload::PayloadLogger;
use interceptor_log_kit::writer::JsonLogger;
use interceptor_log_kit::interceptor_logger;

const HEALTH_CHECK: &str = "/blah.foo.healthcheck/Check";

#[derive(Debug)]
struct CheckRequest {
    service: String,
}

#[derive(Debug)]
struct CheckResponse {
    serving: bool,
}

fn check(payloads: &PayloadLogger<impl interceptor_log_kit::Logger>, req: CheckRequest) -> CheckResponse {
    payloads.request(HEALTH_CHECK, &req);
    let resp = CheckResponse {
        serving: !req.service.is_empty(),
    };
    payloads.response(HEALTH_CHECK, &resp);
    resp
}

fn main() {
    let logger = interceptor_logger(JsonLogger::stdout());
    let payloads = PayloadLogger::new(logger.clone(), |full_method| full_method == HEALTH_CHECK);

    let _server = tonic::transport::Server::builder().layer(LoggingLayer::new(logger));

    let resp = check(&payloads, CheckRequest { service: "users".to_string() });
    println!("serving: {}", resp.serving);
}
