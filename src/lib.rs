pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;
pub mod swagger;
pub mod webdav_xml_parser;

use std::sync::Arc;

use axum::{http::StatusCode, Json};
use config::Config;
use services::{
    ConnectivityProber, DebugToggles, ProfileManager, ProfileStore, SettingsStore, TelemetrySink,
};
use tokio::task::JoinHandle;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

/// Health check endpoint for monitoring
pub async fn health_check() -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(serde_json::json!({"status": "ok"})))
}

/// Wires a [`ProfileManager`] over `settings`.
///
/// Debug toggles are restored from the store and published to the collector
/// before the manager is handed out.
pub async fn bootstrap(
    config: &Config,
    settings: Arc<dyn SettingsStore>,
) -> anyhow::Result<(ProfileManager, JoinHandle<()>)> {
    let store = ProfileStore::new(settings);

    let toggles = Arc::new(DebugToggles::new(store.load_toggles().await?));
    let (telemetry, handle) = TelemetrySink::spawn(
        config.telemetry_collector_url.clone(),
        config.telemetry_queue_capacity,
        toggles.clone(),
        config.telemetry_source.clone(),
    );
    telemetry.publish_toggles();
    info!(
        "Debug forwarding {}",
        if toggles.is_forwarding() { "enabled" } else { "disabled" }
    );

    let prober = ConnectivityProber::new(&config.verify_endpoint_url, config.probe_timeout())?;

    Ok((ProfileManager::new(store, prober, telemetry), handle))
}
