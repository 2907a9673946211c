use std::sync::Arc;
use std::time::Duration;

use davprofile::models::{ConnectionProfile, ProbeResult};
use davprofile::services::{
    ConnectivityProber, DebugToggles, MemorySettingsStore, ProfileManager, ProfileStore,
    TelemetrySink,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn complete_profile() -> ConnectionProfile {
    ConnectionProfile {
        enabled: true,
        url: "https://dav.example.com/dav".to_string(),
        username: "alice".to_string(),
        password: "secret".to_string(),
        path: "/product_images".to_string(),
        port: "443".to_string(),
    }
}

fn prober_for(server: &MockServer) -> ConnectivityProber {
    ConnectivityProber::new(format!("{}/test-webdav", server.uri()), Duration::from_secs(2)).unwrap()
}

fn manager_for(server: &MockServer) -> ProfileManager {
    let store = ProfileStore::new(Arc::new(MemorySettingsStore::new()));
    let (telemetry, _) = TelemetrySink::spawn(None, 8, Arc::new(DebugToggles::default()), "test");
    ProfileManager::new(store, prober_for(server), telemetry)
}

#[tokio::test]
async fn test_success_response_reports_item_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/test-webdav"))
        .and(body_json(json!({
            "url": "https://dav.example.com/dav",
            "username": "alice",
            "password": "secret",
            "path": "/product_images"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "items": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let result = prober_for(&server).probe(&complete_profile()).await;

    assert_eq!(result, ProbeResult::Success { item_count: 5 });
}

#[tokio::test]
async fn test_failure_response_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/test-webdav"))
        .respond_with(
            ResponseTemplate::new(502).set_body_json(json!({"success": false, "error": "denied"})),
        )
        .mount(&server)
        .await;

    let result = prober_for(&server).probe(&complete_profile()).await;

    assert_eq!(result, ProbeResult::Failure { message: "denied".to_string() });
}

#[tokio::test]
async fn test_non_json_response_is_an_error_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = prober_for(&server).probe(&complete_profile()).await;

    assert!(matches!(result, ProbeResult::Error { .. }), "got {:?}", result);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_an_error_result() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/test-webdav", server.uri());
    drop(server);

    let prober = ConnectivityProber::new(endpoint, Duration::from_secs(2)).unwrap();
    let result = prober.probe(&complete_profile()).await;

    match result {
        ProbeResult::Error { message } => assert!(!message.is_empty()),
        other => panic!("expected an error result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_hung_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "items": 1}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let prober =
        ConnectivityProber::new(format!("{}/test-webdav", server.uri()), Duration::from_millis(300))
            .unwrap();
    let result = prober.probe(&complete_profile()).await;

    assert!(matches!(result, ProbeResult::Error { .. }), "got {:?}", result);
}

#[tokio::test]
async fn test_incomplete_profile_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let manager = manager_for(&server);
    for field in ["url", "username", "password"] {
        let mut profile = complete_profile();
        match field {
            "url" => profile.url.clear(),
            "username" => profile.username.clear(),
            _ => profile.password.clear(),
        }

        let result = manager.test_connection(&profile).await;

        match result {
            ProbeResult::Failure { message } => assert!(message.contains(field), "{}", message),
            other => panic!("expected a local failure, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_concurrent_probes_resolve_independently() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "items": 2})))
        .expect(2)
        .mount(&server)
        .await;

    let manager = manager_for(&server);
    let profile = complete_profile();
    let (first, second) = tokio::join!(
        manager.test_connection(&profile),
        manager.test_connection(&profile)
    );

    assert_eq!(first, ProbeResult::Success { item_count: 2 });
    assert_eq!(second, ProbeResult::Success { item_count: 2 });
}
