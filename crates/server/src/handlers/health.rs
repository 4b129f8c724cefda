use axum::http::StatusCode;
use axum::Json;
use common::types::Health;

#[utoipa::path(get, path = "/health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)), tag = "health")]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Prometheus text exposition.
pub async fn metrics() -> (StatusCode, String) {
    crate::metrics::encode_metrics()
}
