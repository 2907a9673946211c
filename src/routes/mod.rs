use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use crate::{health_check, swagger::ApiDoc, AppState};

pub mod debug;
pub mod webdav;

/// Full router of the verification service.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi))
        .merge(webdav::router())
        .merge(debug::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
