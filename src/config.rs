use anyhow::Result;
use std::env;
use std::time::Duration;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_address: String,
    pub verify_endpoint_url: String,
    pub probe_timeout_seconds: u64,
    pub webdav_timeout_seconds: u64,
    pub telemetry_collector_url: Option<String>,
    pub telemetry_queue_capacity: usize,
    pub telemetry_source: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://davprofile.db?mode=rwc".to_string(),
            server_address: "127.0.0.1:3000".to_string(),
            verify_endpoint_url: "http://127.0.0.1:3000/test-webdav".to_string(),
            probe_timeout_seconds: 15,
            webdav_timeout_seconds: 30,
            telemetry_collector_url: Some("http://127.0.0.1:3000".to_string()),
            telemetry_queue_capacity: 256,
            telemetry_source: "davprofile".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let probe_timeout_seconds = env::var("PROBE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.probe_timeout_seconds);
        if !(10..=30).contains(&probe_timeout_seconds) {
            warn!(
                "PROBE_TIMEOUT_SECONDS={} is outside the recommended 10-30s range",
                probe_timeout_seconds
            );
        }

        Ok(Config {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            server_address: env::var("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            verify_endpoint_url: env::var("VERIFY_ENDPOINT_URL")
                .unwrap_or(defaults.verify_endpoint_url),
            probe_timeout_seconds,
            webdav_timeout_seconds: env::var("WEBDAV_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.webdav_timeout_seconds),
            // An explicitly empty collector URL turns forwarding off entirely
            telemetry_collector_url: match env::var("TELEMETRY_COLLECTOR_URL") {
                Ok(value) if value.trim().is_empty() => None,
                Ok(value) => Some(value.trim().to_string()),
                Err(_) => defaults.telemetry_collector_url,
            },
            telemetry_queue_capacity: env::var("TELEMETRY_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|capacity: &usize| *capacity > 0)
                .unwrap_or(defaults.telemetry_queue_capacity),
            telemetry_source: env::var("TELEMETRY_SOURCE").unwrap_or(defaults.telemetry_source),
        })
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }

    pub fn webdav_timeout(&self) -> Duration {
        Duration::from_secs(self.webdav_timeout_seconds)
    }
}
