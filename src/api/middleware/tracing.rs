//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates the request tracing layer.
///
/// One `INFO` span per request carrying method, URI and version; the response
/// is logged with status and latency in milliseconds. 5xx responses (origin
/// unreachable, invalid target) are additionally logged at `WARN`.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET uri=/abc version=HTTP/1.1}: finished processing request latency=1 ms status=301
/// WARN request{method=GET uri=/abc version=HTTP/1.1}: response failed classification=Status code: 503 latency=2003 ms
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::WARN)
                .latency_unit(LatencyUnit::Millis),
        )
}
