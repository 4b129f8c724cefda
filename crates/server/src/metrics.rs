use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "directory_http_requests_total",
        "HTTP requests by matched route and status",
        &["route", "status"]
    )
    .expect("register http_requests_total")
});

pub static SEARCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "directory_search_duration_seconds",
        "Service search duration in seconds",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("register search_duration")
});

/// Count every routed request under its route template, not the raw path.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let response = next.run(req).await;
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[route.as_str(), response.status().as_str()])
        .inc();
    response
}

/// Time a future into the search histogram.
pub async fn time_search<T>(fut: impl std::future::Future<Output = T>) -> T {
    let started = Instant::now();
    let out = fut.await;
    SEARCH_DURATION.observe(started.elapsed().as_secs_f64());
    out
}

pub fn encode_metrics() -> (StatusCode, String) {
    // touch the statics so both families show up before first use
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&SEARCH_DURATION);
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
