use std::sync::Arc;

use axum::{http::StatusCode, routing::post, Json, Router};
use tracing::info;

use crate::{
    models::{DebugEvent, ToggleState},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/debug-log", post(receive_debug_event))
        .route("/debug-toggle", post(receive_toggle_state))
}

#[utoipa::path(
    post,
    path = "/debug-log",
    tag = "debug",
    request_body = DebugEvent,
    responses((status = 204, description = "Event recorded"))
)]
pub async fn receive_debug_event(Json(event): Json<DebugEvent>) -> StatusCode {
    info!(
        target: "davprofile::collector",
        source = %event.source,
        timestamp = %event.timestamp,
        data = %event.data,
        "🐛 {}",
        event.message
    );
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    post,
    path = "/debug-toggle",
    tag = "debug",
    request_body = ToggleState,
    responses((status = 204, description = "Toggle state recorded"))
)]
pub async fn receive_toggle_state(Json(state): Json<ToggleState>) -> StatusCode {
    info!(
        target: "davprofile::collector",
        "Debug logging toggled: page={}, everything={}",
        state.debug_log_enabled,
        state.log_everything_enabled
    );
    StatusCode::NO_CONTENT
}
