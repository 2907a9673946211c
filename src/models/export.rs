use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::profile::ConnectionProfile;

pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// JSON document produced by `export` and accepted by `restore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub webdav: ConnectionProfile,
    pub exported_at: String,
    pub version: String,
}

impl ExportArtifact {
    /// Wraps a profile for export. The password never leaves the store.
    pub fn from_profile(profile: &ConnectionProfile) -> Self {
        let mut webdav = profile.clone();
        webdav.password.clear();
        Self {
            webdav,
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            version: EXPORT_FORMAT_VERSION.to_string(),
        }
    }
}
