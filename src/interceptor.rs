//! Server-side logging middleware for tonic, built as a tower layer.
//!
//! ```no_run
//! use interceptor_log_kit::{adapter::interceptor_logger, interceptor::LoggingLayer, nop::NopLogger};
//!
//! let logger = interceptor_logger(NopLogger);
//! let _server = tonic::transport::Server::builder().layer(LoggingLayer::new(logger));
//! ```

use crate::fields;
use crate::logging::Logger;
use crate::method::split_method;
use crate::options::Options;
use crate::record::Field;
use chrono::{SecondsFormat, Utc};
use futures_util::future::BoxFuture;
use http::{HeaderMap, Request, Response};
use http_body::{Body, Frame, SizeHint};
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tonic::{Code, Status};
use tower::{Layer, Service};

/// Installs [`LoggingService`] around every gRPC route.
#[derive(Clone)]
pub struct LoggingLayer<L> {
    logger: L,
    options: Options,
}

impl<L: Logger + Clone> LoggingLayer<L> {
    pub fn new(logger: L) -> Self {
        Self::with_options(logger, Options::default())
    }

    pub fn with_options(logger: L, options: Options) -> Self {
        LoggingLayer { logger, options }
    }
}

impl<S, L: Clone> Layer<S> for LoggingLayer<L> {
    type Service = LoggingService<S, L>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingService {
            inner,
            logger: self.logger.clone(),
            options: self.options.clone(),
        }
    }
}

/// Logs `started call` (DEBUG) when a request arrives and `finished call`
/// when the call ends, at the level chosen by [`Options::code_to_level`].
///
/// A call ends in one of these ways:
/// - trailers-only response: `grpc-status` is already in the response
///   headers, the line is emitted with the response head;
/// - otherwise the response body is wrapped in [`LoggedBody`] and the
///   line is emitted when the trailers frame arrives, when the body ends
///   without trailers (OK), when the body fails (Unknown), or when the
///   body is dropped early (Canceled);
/// - the inner service fails: Unknown, emitted right away.
#[derive(Clone)]
pub struct LoggingService<S, L> {
    inner: S,
    logger: L,
    options: Options,
}

impl<S, L, ReqBody, ResBody> Service<Request<ReqBody>> for LoggingService<S, L>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: fmt::Display,
    L: Logger + Clone + 'static,
{
    type Response = Response<LoggedBody<ResBody>>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let call = CallInfo::from_request(&req);
        if self.options.should_log(&call.full_method, None) {
            let mut kv = call.fields();
            kv.push(Field::new("msg", "started call"));
            self.logger.debug(&kv);
        }

        let completion = Completion {
            logger: self.logger.clone(),
            options: self.options.clone(),
            call,
            start: Instant::now(),
        };
        let fut = self.inner.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let (parts, body) = res.into_parts();
                    let pending = match status_from_headers(&parts.headers) {
                        Some(status) => {
                            completion.finish(Some(&status));
                            None
                        }
                        None => Some(completion.into_pending()),
                    };
                    Ok(Response::from_parts(parts, LoggedBody { inner: body, pending }))
                }
                Err(e) => {
                    completion.finish(Some(&Status::unknown(e.to_string())));
                    Err(e)
                }
            }
        })
    }
}

type PendingFinish = Box<dyn FnOnce(Option<&Status>) + Send>;

struct Completion<L> {
    logger: L,
    options: Options,
    call: CallInfo,
    start: Instant,
}

impl<L: Logger + 'static> Completion<L> {
    fn finish(self, status: Option<&Status>) {
        finish_call(&self.logger, &self.options, &self.call, status, self.start.elapsed());
    }

    fn into_pending(self) -> PendingFinish {
        Box::new(move |status: Option<&Status>| self.finish(status))
    }
}

/// Response body that emits the `finished call` line once the final
/// status of the call is known.
pub struct LoggedBody<B> {
    inner: B,
    pending: Option<PendingFinish>,
}

impl<B> LoggedBody<B> {
    fn complete(&mut self, status: Option<&Status>) {
        if let Some(finish) = self.pending.take() {
            finish(status);
        }
    }
}

impl<B> Body for LoggedBody<B>
where
    B: Body + Unpin,
    B::Error: fmt::Display,
{
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(trailers) = frame.trailers_ref() {
                    this.complete(status_from_headers(trailers).as_ref());
                }
            }
            Poll::Ready(Some(Err(e))) => this.complete(Some(&Status::unknown(e.to_string()))),
            Poll::Ready(None) => this.complete(None),
            Poll::Pending => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for LoggedBody<B> {
    fn drop(&mut self) {
        if self.pending.is_some() {
            self.complete(Some(&Status::cancelled("response body dropped before the call ended")));
        }
    }
}

/// What the middleware knows about a call before it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct CallInfo {
    pub full_method: String,
    pub service: String,
    pub method: String,
    pub peer: Option<String>,
    pub start_time: String,
}

impl CallInfo {
    pub fn new(full_method: impl Into<String>) -> Self {
        let full_method = full_method.into();
        let (service, method) = split_method(&full_method);
        CallInfo {
            service: service.to_string(),
            method: method.to_string(),
            full_method,
            peer: None,
            start_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn from_request<B>(req: &Request<B>) -> Self {
        let mut call = CallInfo::new(req.uri().path());
        call.peer = req
            .extensions()
            .get::<tonic::transport::server::TcpConnectInfo>()
            .and_then(|info| info.remote_addr())
            .map(|addr| addr.to_string());
        call
    }

    /// Fields shared by every line logged for this call.
    pub fn fields(&self) -> Vec<Field> {
        let mut kv = fields![
            "grpc.component" => "server",
            "grpc.service" => self.service.as_str(),
            "grpc.method" => self.method.as_str(),
        ];
        if let Some(peer) = &self.peer {
            kv.push(Field::new("peer.address", peer.as_str()));
        }
        kv.push(Field::new("grpc.start_time", self.start_time.as_str()));
        kv
    }
}

/// Emit the completion line for `call`, unless the decider rejects it.
///
/// `status` is `None` (or carries [`Code::Ok`]) for a successful call.
pub fn finish_call<L: Logger + ?Sized>(
    logger: &L,
    options: &Options,
    call: &CallInfo,
    status: Option<&Status>,
    elapsed: std::time::Duration,
) {
    let err = status.filter(|s| s.code() != Code::Ok);
    if !options.should_log(&call.full_method, err) {
        return;
    }

    let code = err.map(Status::code).unwrap_or(Code::Ok);
    let mut kv = call.fields();
    kv.push(Field::new("grpc.code", code_name(code)));
    if let Some(err) = err {
        kv.push(Field::new("grpc.error", err.message()));
    }
    kv.extend(options.duration_fields(elapsed));
    kv.push(Field::new("msg", "finished call"));
    logger.log(options.level_for(code), &kv);
}

/// Canonical gRPC name of a status code, as used in `grpc.code`.
pub fn code_name(code: Code) -> &'static str {
    match code {
        Code::Ok => "OK",
        Code::Cancelled => "Canceled",
        Code::Unknown => "Unknown",
        Code::InvalidArgument => "InvalidArgument",
        Code::DeadlineExceeded => "DeadlineExceeded",
        Code::NotFound => "NotFound",
        Code::AlreadyExists => "AlreadyExists",
        Code::PermissionDenied => "PermissionDenied",
        Code::ResourceExhausted => "ResourceExhausted",
        Code::FailedPrecondition => "FailedPrecondition",
        Code::Aborted => "Aborted",
        Code::OutOfRange => "OutOfRange",
        Code::Unimplemented => "Unimplemented",
        Code::Internal => "Internal",
        Code::Unavailable => "Unavailable",
        Code::DataLoss => "DataLoss",
        Code::Unauthenticated => "Unauthenticated",
    }
}

fn status_from_headers(headers: &HeaderMap) -> Option<Status> {
    let code = headers
        .get("grpc-status")?
        .to_str()
        .ok()?
        .trim()
        .parse::<i32>()
        .ok()?;
    let message = headers
        .get("grpc-message")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    Some(Status::new(Code::from_i32(code), message.to_string()))
}
