use crate::fields;
use crate::logging::Logger;
use crate::method::split_method;
use std::fmt;
use std::sync::Arc;

/// Decides whether the payloads of a call (by full method name) are logged.
pub type PayloadDecider = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Logs request and response messages of selected methods at INFO.
///
/// Message bodies are opaque to the tower layer, so handlers call this
/// helper with the decoded message. The message is rendered with its
/// `Debug` implementation.
#[derive(Clone)]
pub struct PayloadLogger<L> {
    logger: L,
    decider: PayloadDecider,
}

impl<L: Logger> PayloadLogger<L> {
    pub fn new<F>(logger: L, decider: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        PayloadLogger {
            logger,
            decider: Arc::new(decider),
        }
    }

    pub fn request<M: fmt::Debug>(&self, full_method: &str, message: &M) {
        self.payload(full_method, "grpc.request.content", "request", message);
    }

    pub fn response<M: fmt::Debug>(&self, full_method: &str, message: &M) {
        self.payload(full_method, "grpc.response.content", "response", message);
    }

    fn payload<M: fmt::Debug>(&self, full_method: &str, key: &str, kind: &str, message: &M) {
        if !(self.decider)(full_method) {
            return;
        }
        let (service, method) = split_method(full_method);
        self.logger.info(&fields![
            "grpc.service" => service,
            "grpc.method" => method,
            key => format!("{:?}", message),
            "msg" => format!("{} payload logged as {} field", kind, key),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::record::Field;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Captured(Mutex<Vec<(Level, Vec<Field>)>>);

    impl Logger for Captured {
        fn log(&self, level: Level, fields: &[Field]) {
            self.0.lock().unwrap().push((level, fields.to_vec()));
        }
    }

    #[derive(Debug)]
    #[allow(dead_code)]
    struct CheckRequest {
        service: String,
    }

    #[test]
    fn logs_only_decided_methods() {
        let captured = Arc::new(Captured::default());
        let payloads = PayloadLogger::new(Arc::clone(&captured), |m| m == "/blah.foo.healthcheck/Check");

        let req = CheckRequest { service: "db".into() };
        payloads.request("/blah.foo.healthcheck/Check", &req);
        payloads.request("/blah.foo.Users/Get", &req);

        let lines = captured.0.lock().unwrap();
        assert_eq!(lines.len(), 1);
        let (level, kv) = &lines[0];
        assert_eq!(*level, Level::Info);
        assert_eq!(kv[0], Field::new("grpc.service", "blah.foo.healthcheck"));
        assert_eq!(kv[1], Field::new("grpc.method", "Check"));
        assert_eq!(kv[2].key, "grpc.request.content");
        assert_eq!(kv[2].value, r#"CheckRequest { service: "db" }"#);
    }

    #[test]
    fn response_uses_response_key() {
        let captured = Arc::new(Captured::default());
        let payloads = PayloadLogger::new(Arc::clone(&captured), |_| true);
        payloads.response("/a.B/C", &42u32);

        let lines = captured.0.lock().unwrap();
        assert_eq!(lines[0].1[2], Field::new("grpc.response.content", "42"));
        assert_eq!(lines[0].1[3].value, "response payload logged as grpc.response.content field");
    }

    #[test]
    fn missing_service_matches_middleware_naming() {
        let captured = Arc::new(Captured::default());
        let payloads = PayloadLogger::new(Arc::clone(&captured), |_| true);
        payloads.request("//Check", &());

        let lines = captured.0.lock().unwrap();
        assert_eq!(lines[0].1[0], Field::new("grpc.service", "unknown"));
        assert_eq!(lines[0].1[1], Field::new("grpc.method", "Check"));
    }
}
