use utoipa::OpenApi;

use crate::models::{DebugEvent, ToggleState, VerificationRequest, VerificationResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::webdav::test_webdav_connection,
        crate::routes::debug::receive_debug_event,
        crate::routes::debug::receive_toggle_state,
    ),
    components(
        schemas(VerificationRequest, VerificationResponse, DebugEvent, ToggleState)
    ),
    tags(
        (name = "webdav", description = "WebDAV connection verification"),
        (name = "debug", description = "Debug telemetry collector")
    ),
    info(
        title = "davprofile verification service",
        description = "Verifies WebDAV connection profiles and collects debug telemetry"
    )
)]
pub struct ApiDoc;
