use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A structured record forwarded to the debug collector. Never stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DebugEvent {
    pub message: String,
    #[schema(value_type = Object)]
    pub data: Value,
    /// ISO-8601, UTC.
    pub timestamp: String,
    pub source: String,
}

impl DebugEvent {
    pub fn new(message: impl Into<String>, data: Value, source: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            source: source.into(),
        }
    }
}

/// Toggle state as persisted and as published to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleState {
    pub debug_log_enabled: bool,
    pub log_everything_enabled: bool,
}

impl ToggleState {
    pub fn forwards(&self) -> bool {
        self.debug_log_enabled || self.log_everything_enabled
    }
}
