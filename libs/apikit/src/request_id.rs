use std::time::Duration;

use axum::http::{header::CONTENT_LENGTH, HeaderName, Request};
use axum::{body::Body, middleware::Next, response::IntoResponse, response::Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{MakeRequestId, RequestId};
use tower_http::trace::{DefaultOnRequest, TraceLayer};
use tracing::{field::Empty, Span};

use crate::problem::{Problem, ProblemResponse};

/// Request id as seen by handlers.
#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

pub fn header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

/// Generates ids for requests that arrive without `x-request-id`.
#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

fn header_id<B>(req: &Request<B>) -> Option<&str> {
    req.headers().get(header()).and_then(|v| v.to_str().ok())
}

/// Exposes the request id to handlers, records it on the request span and
/// stamps it into any problem body produced further down the stack.
pub async fn attach_request_id(mut req: Request<Body>, next: Next) -> Response {
    let rid = header_id(&req).unwrap_or("n/a").to_owned();

    req.extensions_mut().insert(XRequestId(rid.clone()));
    Span::current().record("request_id", tracing::field::display(&rid));

    let resp = next.run(req).await;

    let Some(problem) = resp
        .extensions()
        .get::<Problem>()
        .filter(|p| p.request_id.is_none())
        .cloned()
    else {
        return resp;
    };

    let (parts, _) = resp.into_parts();
    let mut stamped = ProblemResponse(problem.with_request_id(rid)).into_response();
    for (name, value) in parts.headers.iter() {
        if *name != CONTENT_LENGTH {
            stamped.headers_mut().entry(name).or_insert_with(|| value.clone());
        }
    }
    stamped
}

#[allow(clippy::type_complexity)]
pub fn create_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl Fn(&Request<Body>) -> Span + Clone,
    DefaultOnRequest,
    impl Fn(&Response<Body>, Duration, &Span) + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri().path(),
                request_id = %header_id(req).unwrap_or("n/a"),
                status = Empty,
                latency_ms = Empty
            )
        })
        .on_response(|resp: &Response<Body>, latency: Duration, span: &Span| {
            span.record("status", resp.status().as_u16());
            span.record("latency_ms", latency.as_millis() as u64);
            tracing::debug!(parent: span, "response sent");
        })
}
