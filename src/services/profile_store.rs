use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::models::{ConnectionProfile, ToggleState};

pub const PROFILE_KEY: &str = "webdavSettings";
pub const DEBUG_LOG_KEY: &str = "debugLogEnabled";
pub const LOG_EVERYTHING_KEY: &str = "logEverythingEnabled";

/// Local key-value persistence. Each `put` replaces the whole value.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Non-persistent store for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemorySettingsStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the persisted profile and debug toggles.
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn SettingsStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Loads the profile, falling back to defaults for anything never saved.
    ///
    /// An unreadable record is treated as never saved.
    pub async fn load(&self) -> Result<ConnectionProfile, StoreError> {
        let profile = match self.store.get(PROFILE_KEY).await? {
            Some(raw) => match serde_json::from_str::<ConnectionProfile>(&raw) {
                Ok(profile) => profile,
                Err(e) => {
                    warn!("Stored {} record is unreadable, using defaults: {}", PROFILE_KEY, e);
                    ConnectionProfile::default()
                }
            },
            None => ConnectionProfile::default(),
        };
        Ok(profile.with_manual_defaults())
    }

    /// Replaces the stored profile with `profile`, manual defaults applied.
    pub async fn save(&self, profile: &ConnectionProfile) -> Result<ConnectionProfile, StoreError> {
        let profile = profile.clone().with_manual_defaults();
        let encoded = serde_json::to_string(&profile).map_err(|source| StoreError::Encode {
            key: PROFILE_KEY.to_string(),
            source,
        })?;

        if !profile.password.is_empty() {
            warn!("WebDAV password is being persisted in cleartext");
        }

        self.store.put(PROFILE_KEY, &encoded).await?;
        debug!("Saved {} record", PROFILE_KEY);
        Ok(profile)
    }

    pub async fn load_toggles(&self) -> Result<ToggleState, StoreError> {
        Ok(ToggleState {
            debug_log_enabled: self.load_flag(DEBUG_LOG_KEY).await?,
            log_everything_enabled: self.load_flag(LOG_EVERYTHING_KEY).await?,
        })
    }

    pub async fn save_toggles(&self, state: ToggleState) -> Result<(), StoreError> {
        self.store
            .put(DEBUG_LOG_KEY, &state.debug_log_enabled.to_string())
            .await?;
        self.store
            .put(LOG_EVERYTHING_KEY, &state.log_everything_enabled.to_string())
            .await
    }

    async fn load_flag(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.store.get(key).await?.as_deref() == Some("true"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (MemorySettingsStore, ProfileStore) {
        let memory = MemorySettingsStore::new();
        let profiles = ProfileStore::new(Arc::new(memory.clone()));
        (memory, profiles)
    }

    #[tokio::test]
    async fn test_load_returns_defaults_on_first_run() {
        let (_, profiles) = store();
        assert_eq!(profiles.load().await.unwrap(), ConnectionProfile::default());
    }

    #[tokio::test]
    async fn test_save_then_load_returns_same_profile() {
        let (_, profiles) = store();
        let profile = ConnectionProfile {
            enabled: true,
            url: "https://dav.example.com/remote".to_string(),
            username: "alice".to_string(),
            password: "secret".to_string(),
            path: "/remote".to_string(),
            port: "8443".to_string(),
        };

        profiles.save(&profile).await.unwrap();

        assert_eq!(profiles.load().await.unwrap(), profile);
    }

    #[tokio::test]
    async fn test_save_of_load_leaves_record_unchanged() {
        let (memory, profiles) = store();
        profiles
            .save(&ConnectionProfile {
                url: "http://h/dav".to_string(),
                path: String::new(),
                ..Default::default()
            })
            .await
            .unwrap();
        let before = memory.raw(PROFILE_KEY).await.unwrap();

        let loaded = profiles.load().await.unwrap();
        profiles.save(&loaded).await.unwrap();

        assert_eq!(memory.raw(PROFILE_KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_save_fills_empty_path_and_port() {
        let (memory, profiles) = store();
        let saved = profiles
            .save(&ConnectionProfile {
                path: String::new(),
                port: String::new(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(saved.path, "/product_images");
        assert_eq!(saved.port, "443");

        let raw: serde_json::Value =
            serde_json::from_str(&memory.raw(PROFILE_KEY).await.unwrap()).unwrap();
        assert_eq!(raw["path"], "/product_images");
        assert_eq!(raw["port"], "443");
        assert_eq!(raw["enabled"], false);
    }

    #[tokio::test]
    async fn test_corrupt_record_loads_defaults() {
        let (memory, profiles) = store();
        memory.put(PROFILE_KEY, "{not json").await.unwrap();
        assert_eq!(profiles.load().await.unwrap(), ConnectionProfile::default());
    }

    #[tokio::test]
    async fn test_toggles_are_stored_as_stringified_booleans() {
        let (memory, profiles) = store();
        assert_eq!(profiles.load_toggles().await.unwrap(), ToggleState::default());

        profiles
            .save_toggles(ToggleState {
                debug_log_enabled: true,
                log_everything_enabled: false,
            })
            .await
            .unwrap();

        assert_eq!(memory.raw(DEBUG_LOG_KEY).await.as_deref(), Some("true"));
        assert_eq!(memory.raw(LOG_EVERYTHING_KEY).await.as_deref(), Some("false"));
        assert!(profiles.load_toggles().await.unwrap().debug_log_enabled);
    }
}
