use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use std::time::Instant;

/// Path label for requests that reached the fallback
pub const UNMATCHED_PATH_LABEL: &str = "unmatched";

/// Metrics middleware that tracks request metrics
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = path_label(&request);
    let start = Instant::now();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone())
        .increment(1);

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let duration = start.elapsed();

    histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .record(duration.as_secs_f64());

    counter!(
        "http_responses_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    if response.status().is_server_error() {
        counter!(
            "http_errors_total",
            "method" => method,
            "path" => path,
            "status" => status
        )
        .increment(1);
    }

    response
}

/// Route template of the request; raw paths would give one series per URL.
fn path_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH_LABEL.to_string())
}

/// Track monthly maintenance runs by outcome
/// (`archived`, `archive_missing`, `rejected`, `transport_error`)
pub fn track_maintenance_run(outcome: &'static str) {
    counter!("monthly_maintenance_runs_total", "outcome" => outcome).increment(1);
}
