use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Base path used when a profile is completed by hand (save/load time).
pub const MANUAL_DEFAULT_PATH: &str = "/product_images";

/// Base path appended to URLs synthesized from an imported foreign document.
///
/// Deliberately different from [`MANUAL_DEFAULT_PATH`]: the two code paths
/// target different server ecosystems and existing users rely on both.
pub const IMPORT_DEFAULT_PATH: &str = "/dav";

pub const DEFAULT_PORT: &str = "443";

/// The canonical, persisted WebDAV connection profile.
///
/// Serialized as the `webdavSettings` record. Every field falls back to its
/// default when missing from a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ConnectionProfile {
    pub enabled: bool,
    pub url: String,
    pub username: String,
    /// Stored in cleartext.
    pub password: String,
    pub path: String,
    pub port: String,
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            username: String::new(),
            password: String::new(),
            path: MANUAL_DEFAULT_PATH.to_string(),
            port: DEFAULT_PORT.to_string(),
        }
    }
}

impl ConnectionProfile {
    /// Fills empty `path`/`port` with the manual defaults.
    pub fn with_manual_defaults(mut self) -> Self {
        if self.path.is_empty() {
            self.path = MANUAL_DEFAULT_PATH.to_string();
        }
        if self.port.is_empty() {
            self.port = DEFAULT_PORT.to_string();
        }
        self
    }

    /// Names of the fields a connectivity probe cannot run without.
    pub fn missing_probe_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.url.trim().is_empty() {
            missing.push("url");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }

    pub fn apply_update(&mut self, update: ProfileUpdate) {
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
        if let Some(url) = update.url {
            self.url = url.trim().to_string();
        }
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(password) = update.password {
            self.password = password;
        }
        if let Some(path) = update.path {
            self.path = path;
        }
        if let Some(port) = update.port {
            self.port = port.trim().to_string();
        }
    }

    /// Merges an imported fragment. A new `url` brings the path and port it was
    /// built from, so stale values never survive next to it. The stored
    /// password and any username the fragment lacks are kept.
    pub fn apply_fragment(&mut self, fragment: &ProfileFragment) {
        self.enabled = fragment.enabled;
        if let Some(username) = &fragment.username {
            self.username = username.clone();
        }
        match &fragment.url {
            Some(url) => {
                self.url = url.clone();
                self.path = fragment
                    .path
                    .clone()
                    .unwrap_or_else(|| IMPORT_DEFAULT_PATH.to_string());
                self.port = fragment
                    .port
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PORT.to_string());
            }
            None => {
                if let Some(path) = &fragment.path {
                    self.path = path.clone();
                }
                if let Some(port) = &fragment.port {
                    self.port = port.clone();
                }
            }
        }
    }

    /// Copy safe to print or log.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.password.is_empty() {
            copy.password = "********".to_string();
        }
        copy
    }
}

/// A user edit; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    pub enabled: Option<bool>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub path: Option<String>,
    pub port: Option<String>,
}

/// Best-effort profile derived from a foreign document.
///
/// Imported profiles are always enabled and never carry a usable secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileFragment {
    pub enabled: bool,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: String,
    pub path: Option<String>,
    pub port: Option<String>,
}

impl Default for ProfileFragment {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            username: None,
            password: String::new(),
            path: None,
            port: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_uses_manual_defaults() {
        let profile = ConnectionProfile::default();
        assert!(!profile.enabled);
        assert_eq!(profile.path, "/product_images");
        assert_eq!(profile.port, "443");
        assert!(profile.url.is_empty());
    }

    #[test]
    fn test_missing_fields_in_stored_record_fall_back_to_defaults() {
        let profile: ConnectionProfile =
            serde_json::from_str(r#"{"url":"https://dav.example.com","username":"bob"}"#).unwrap();
        assert_eq!(profile.url, "https://dav.example.com");
        assert_eq!(profile.path, MANUAL_DEFAULT_PATH);
        assert_eq!(profile.port, DEFAULT_PORT);
        assert!(profile.password.is_empty());
    }

    #[test]
    fn test_manual_defaults_only_fill_empty_fields() {
        let profile = ConnectionProfile {
            path: String::new(),
            port: "8443".to_string(),
            ..Default::default()
        }
        .with_manual_defaults();
        assert_eq!(profile.path, "/product_images");
        assert_eq!(profile.port, "8443");
    }

    #[test]
    fn test_missing_probe_fields() {
        let mut profile = ConnectionProfile::default();
        assert_eq!(profile.missing_probe_fields(), vec!["url", "username", "password"]);

        profile.url = "https://dav.example.com".to_string();
        profile.username = "bob".to_string();
        profile.password = "secret".to_string();
        assert!(profile.missing_probe_fields().is_empty());
    }

    #[test]
    fn test_fragment_keeps_stored_password_and_absent_fields() {
        let mut profile = ConnectionProfile {
            enabled: false,
            url: "https://old.example.com".to_string(),
            username: "old".to_string(),
            password: "keep-me".to_string(),
            path: "/old".to_string(),
            port: "8080".to_string(),
        };
        let fragment = ProfileFragment {
            url: Some("https://new.example.com/dav".to_string()),
            username: Some("new".to_string()),
            ..Default::default()
        };

        profile.apply_fragment(&fragment);

        assert!(profile.enabled);
        assert_eq!(profile.url, "https://new.example.com/dav");
        assert_eq!(profile.username, "new");
        assert_eq!(profile.password, "keep-me");
        assert_eq!(profile.path, IMPORT_DEFAULT_PATH);
        assert_eq!(profile.port, DEFAULT_PORT);
    }

    #[test]
    fn test_apply_fragment_takes_path_and_port_from_the_url_source() {
        let mut profile = ConnectionProfile {
            path: "/old".to_string(),
            port: "8080".to_string(),
            ..Default::default()
        };
        let fragment = ProfileFragment {
            url: Some("https://h:8443/files".to_string()),
            path: Some("/files".to_string()),
            port: Some("8443".to_string()),
            ..Default::default()
        };

        profile.apply_fragment(&fragment);

        assert_eq!(profile.path, "/files");
        assert_eq!(profile.port, "8443");
    }

    #[test]
    fn test_redacted_masks_password() {
        let profile = ConnectionProfile {
            password: "secret".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.redacted().password, "********");
        assert!(ConnectionProfile::default().redacted().password.is_empty());
    }
}
