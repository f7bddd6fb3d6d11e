//! Per-request HTTP metrics.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Records `http_requests_total` and `http_response_time_seconds` for every
/// routed request.
///
/// The `path` label is the route template (`/pvz/{pvz_id}/...`), never the
/// raw URI, so ids do not turn into label values. Must be installed with
/// `route_layer` for `MatchedPath` to be present.
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = request.method().to_string();

    let response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "http_requests_total",
        "path" => path.clone(),
        "method" => method.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "http_response_time_seconds",
        "path" => path,
        "method" => method
    )
    .record(elapsed);

    response
}
