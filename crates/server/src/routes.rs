use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod features;
pub mod forms;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let form_routes = Router::new()
        .route("/forms/image-job", get(forms::image_job_schema).post(forms::submit_image_job))
        .route("/forms/extra-repos", get(forms::extra_repos_schema))
        .route("/forms/extra-tokens", get(forms::extra_tokens_schema))
        .route("/forms/tags", axum::routing::post(forms::clean_tags))
        .route("/forms/search", axum::routing::post(forms::clean_search));

    let feature_routes = Router::new()
        .route("/features", get(features::list))
        .route("/features/:name", get(features::expand));

    Router::new()
        .route("/health", get(health))
        .merge(form_routes)
        .merge(feature_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
