use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{health, reference, services, users};
use crate::metrics;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

/// Build the full application router: API, health, metrics and docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/services", get(services::search_services).post(services::create_service))
        .route(
            "/api/services/:id",
            get(services::show_service).put(services::update_service).delete(services::delete_service),
        )
        .route("/api/services/:id/reviews", post(services::create_review))
        .route("/api/users", post(users::create_user))
        .route("/api/users/:id/services", get(users::user_services))
        .route("/api/states", get(reference::list_states))
        .route("/api/categories", get(reference::list_categories))
        .route_layer(middleware::from_fn(metrics::track_requests))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency on the way out
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and transport failures at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
