use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info};

use crate::{
    errors::ApiError,
    models::{VerificationRequest, VerificationResponse},
    services::webdav::{WebDAVConfig, WebDAVConnection},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/test-webdav", post(test_webdav_connection))
}

#[utoipa::path(
    post,
    path = "/test-webdav",
    tag = "webdav",
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Connection verified", body = VerificationResponse),
        (status = 400, description = "Incomplete connection details", body = VerificationResponse),
        (status = 502, description = "WebDAV server rejected or could not be reached", body = VerificationResponse)
    )
)]
pub async fn test_webdav_connection(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VerificationResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    info!(
        "Testing WebDAV connection to: {} (path: {})",
        request.url, request.path
    );

    let config = WebDAVConfig::from_request(&request, state.config.webdav_timeout_seconds);
    let connection = match WebDAVConnection::new(config) {
        Ok(connection) => connection,
        Err(e) => {
            error!("Rejected WebDAV test request: {}", e);
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(VerificationResponse::failed(e.to_string())),
            ));
        }
    };

    let result = connection.test_connection().await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    Ok((status, Json(result)))
}
