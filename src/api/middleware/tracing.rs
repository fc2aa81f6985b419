//! HTTP request/response tracing middleware.

use axum::{body::Body, http::Request};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type MakeSpan = fn(&Request<Body>) -> Span;

/// Creates a tracing middleware for HTTP requests.
///
/// Each request gets an `INFO` span with the method and path. The query
/// string is left out of the span. Responses are logged at `INFO` with status
/// and latency in milliseconds.
///
/// ```text
/// INFO request{method=GET path=/}: finished processing request latency=1 ms status=302
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpan> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as MakeSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
    )
}
