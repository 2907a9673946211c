use serde_json::json;
use tracing::{info, warn};
use url::Url;

use crate::errors::{ImportError, StoreError};
use crate::models::{
    ConnectionProfile, ExportArtifact, ProbeResult, ProfileFragment, ProfileUpdate, ToggleState,
    DEFAULT_PORT, EXPORT_FORMAT_VERSION, MANUAL_DEFAULT_PATH,
};
use crate::services::foreign_profile::parse_foreign_profile;
use crate::services::profile_store::ProfileStore;
use crate::services::prober::ConnectivityProber;
use crate::services::synthesizer::synthesize_profile;
use crate::services::telemetry::TelemetrySink;

/// Coordinates the store, the importer, the prober and debug telemetry.
#[derive(Clone)]
pub struct ProfileManager {
    store: ProfileStore,
    prober: ConnectivityProber,
    telemetry: TelemetrySink,
}

impl ProfileManager {
    pub fn new(store: ProfileStore, prober: ConnectivityProber, telemetry: TelemetrySink) -> Self {
        Self {
            store,
            prober,
            telemetry,
        }
    }

    pub fn telemetry(&self) -> &TelemetrySink {
        &self.telemetry
    }

    pub async fn current_profile(&self) -> Result<ConnectionProfile, StoreError> {
        let profile = self.store.load().await?;
        self.telemetry
            .emit("Profile loaded", json!({ "profile": profile.redacted() }));
        Ok(profile)
    }

    /// Applies a user edit and persists the result.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<ConnectionProfile, StoreError> {
        let mut profile = self.store.load().await?;
        profile.apply_update(update);
        let saved = self.store.save(&profile).await?;
        self.telemetry
            .emit("Profile updated", json!({ "profile": saved.redacted() }));
        Ok(saved)
    }

    /// Resets the base path and port to the manual defaults.
    pub async fn load_defaults(&self) -> Result<ConnectionProfile, StoreError> {
        let mut profile = self.store.load().await?;
        profile.path = MANUAL_DEFAULT_PATH.to_string();
        profile.port = DEFAULT_PORT.to_string();
        let saved = self.store.save(&profile).await?;
        info!("Loaded default WebDAV path and port");
        self.telemetry
            .emit("Defaults loaded", json!({ "path": saved.path, "port": saved.port }));
        Ok(saved)
    }

    /// Imports a foreign profile document and merges it into the stored profile.
    ///
    /// Nothing is persisted unless the document parses and yields a valid URL.
    pub async fn import_foreign_document(&self, document: &str) -> Result<ConnectionProfile, ImportError> {
        self.telemetry
            .emit("Import started", json!({ "bytes": document.len() }));

        let Some(fields) = parse_foreign_profile(document) else {
            warn!("Import rejected: document is not well-formed");
            self.telemetry.emit("Import failed", json!({ "reason": "unparseable" }));
            return Err(ImportError::Unparseable);
        };

        let fragment = synthesize_profile(&fields);
        self.telemetry.emit(
            "Import parsed",
            json!({
                "hostname": fields.hostname,
                "protocol": fields.protocol,
                "port": fields.port,
                "path": fields.path,
                "url": fragment.url,
            }),
        );

        let Some(url) = fragment.url.clone() else {
            warn!("Import incomplete: no hostname in document");
            self.telemetry
                .emit("Import failed", json!({ "reason": "missing hostname" }));
            return Err(ImportError::MissingHostname { fragment });
        };
        validate_url(&url)?;

        let merged = self.merge_fragment(&fragment).await?;
        info!("📥 Imported WebDAV profile for {}", merged.url);
        self.telemetry
            .emit("Import completed", json!({ "profile": merged.redacted() }));
        Ok(merged)
    }

    async fn merge_fragment(&self, fragment: &ProfileFragment) -> Result<ConnectionProfile, StoreError> {
        let mut profile = self.store.load().await?;
        profile.apply_fragment(fragment);
        self.store.save(&profile).await
    }

    pub async fn export_profile(&self) -> Result<ExportArtifact, StoreError> {
        let profile = self.store.load().await?;
        let artifact = ExportArtifact::from_profile(&profile);
        self.telemetry
            .emit("Profile exported", json!({ "exportedAt": artifact.exported_at }));
        Ok(artifact)
    }

    /// Restores a profile from an export artifact. The stored password is kept.
    pub async fn restore_export(&self, raw: &str) -> Result<ConnectionProfile, ImportError> {
        let artifact: ExportArtifact =
            serde_json::from_str(raw).map_err(|e| ImportError::InvalidExport {
                reason: e.to_string(),
            })?;

        if artifact.version != EXPORT_FORMAT_VERSION {
            return Err(ImportError::UnsupportedVersion {
                version: artifact.version,
            });
        }
        if !artifact.webdav.url.is_empty() {
            validate_url(&artifact.webdav.url)?;
        }

        let password = self.store.load().await?.password;
        let profile = ConnectionProfile {
            password,
            ..artifact.webdav
        };
        let saved = self.store.save(&profile).await?;

        info!("Restored WebDAV profile exported at {}", artifact.exported_at);
        self.telemetry
            .emit("Profile restored", json!({ "profile": saved.redacted() }));
        Ok(saved)
    }

    /// Verifies `profile` through the prober, or fails locally when a required
    /// field is missing.
    pub async fn test_connection(&self, profile: &ConnectionProfile) -> ProbeResult {
        let missing = profile.missing_probe_fields();
        if !missing.is_empty() {
            let result = ProbeResult::Failure {
                message: format!("Missing required fields: {}", missing.join(", ")),
            };
            self.telemetry
                .emit("Connection test skipped", json!({ "missing": missing }));
            return result;
        }

        self.telemetry.emit(
            "Connection test started",
            json!({ "url": profile.url, "path": profile.path, "endpoint": self.prober.endpoint() }),
        );
        let result = self.prober.probe(profile).await;
        self.telemetry
            .emit("Connection test finished", json!({ "result": result }));
        result
    }

    /// Updates the debug toggles, persists them and publishes the new state.
    pub async fn set_debug_toggles(
        &self,
        debug_log_enabled: Option<bool>,
        log_everything_enabled: Option<bool>,
    ) -> Result<ToggleState, StoreError> {
        let toggles = self.telemetry.toggles();
        let mut state = toggles.snapshot();
        if let Some(enabled) = debug_log_enabled {
            state.debug_log_enabled = enabled;
        }
        if let Some(enabled) = log_everything_enabled {
            state.log_everything_enabled = enabled;
        }

        self.store.save_toggles(state).await?;
        toggles.set(state);
        self.telemetry.publish_toggles();
        info!(
            "Debug logging: page={}, everything={}",
            state.debug_log_enabled, state.log_everything_enabled
        );
        Ok(state)
    }
}

fn validate_url(url: &str) -> Result<(), ImportError> {
    let parsed = Url::parse(url).map_err(|e| ImportError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ImportError::InvalidUrl {
            url: url.to_string(),
            reason: "expected an http or https URL with a host".to_string(),
        });
    }
    Ok(())
}
